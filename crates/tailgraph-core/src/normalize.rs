// Field normalization
//
// Rewrites raw record keys from their source naming convention (PascalCase
// from the CLI status path, camelCase from the HTTP API) into canonical
// snake_case, recursively for nested maps, and computes the derived fields
// that need cross-field logic: address-family classification, the
// online/offline heuristic, and the self-identity check.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::model::host::HostStatus;
use crate::model::record::{NormalizedRecord, RawRecord};

/// Exact `lastSeen` wire format: `2022-07-13T09:29:56Z`.
const LAST_SEEN_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// ── Key mapping ─────────────────────────────────────────────────────

/// Rewrite one key into canonical snake_case.
///
/// A separator is inserted before the first uppercase letter of each
/// consecutive uppercase run (never at the start of the key), then the whole
/// key is lowercased: `LastSeen` → `last_seen`, `RxBytes` → `rx_bytes`,
/// `ID` → `id`. Idempotent on already-canonical keys. Non-alphanumeric
/// characters pass through untouched, so free-form nested keys like the
/// latency region `San Francisco` come out as `san _francisco` rather than
/// strict snake_case.
pub fn map_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut last_upper = false;
    for (i, c) in key.chars().enumerate() {
        if c.is_uppercase() {
            if !last_upper && i != 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            last_upper = true;
        } else {
            out.push(c);
            last_upper = false;
        }
    }
    out
}

/// Normalize every key of a raw record, recursing into nested maps.
///
/// Non-map values — including lists, which the sources only ever populate
/// with scalars — pass through unchanged at the leaf.
pub fn normalize_record(raw: RawRecord) -> NormalizedRecord {
    let mut out = NormalizedRecord::new();
    for (key, value) in raw {
        out.insert(map_key(&key), normalize_value(value));
    }
    out
}

fn normalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_record(map)),
        other => other,
    }
}

// ── Address classification ──────────────────────────────────────────

/// Pick the first IPv4 and first IPv6 literal from an address list, in list
/// order. A missing family is not an error — the slot stays unset.
pub fn classify_addresses(addresses: &[String]) -> (Option<String>, Option<String>) {
    let mut ipv4 = None;
    let mut ipv6 = None;
    for addr in addresses {
        if ipv4.is_none() && addr.parse::<std::net::Ipv4Addr>().is_ok() {
            ipv4 = Some(addr.clone());
        } else if ipv6.is_none() && addr.parse::<std::net::Ipv6Addr>().is_ok() {
            ipv6 = Some(addr.clone());
        }
    }
    (ipv4, ipv6)
}

/// Extract the `addresses` list from a normalized record as string literals.
pub fn extract_addresses(attrs: &NormalizedRecord) -> Vec<String> {
    attrs
        .get("addresses")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

// ── Online heuristic ────────────────────────────────────────────────

/// Decide online/offline from a normalized record.
///
/// A host with any non-empty latency measurement is online. Otherwise it is
/// online if `last_seen` parses in the exact wire format and lies within
/// `timeout_minutes` of `now` (inclusive). Missing or malformed timestamps
/// degrade to offline — never an error. Heuristic only: a host flapping at
/// the window boundary will toggle between runs.
pub fn online_status(
    attrs: &NormalizedRecord,
    now: DateTime<Utc>,
    timeout_minutes: i64,
) -> HostStatus {
    let latency = attrs
        .get("client_connectivity")
        .and_then(|v| v.get("latency"))
        .and_then(Value::as_object);
    if latency.is_some_and(|l| !l.is_empty()) {
        return HostStatus::Online;
    }

    let Some(last_seen) = attrs.get("last_seen").and_then(Value::as_str) else {
        return HostStatus::Offline;
    };
    let Ok(parsed) = NaiveDateTime::parse_from_str(last_seen, LAST_SEEN_FORMAT) else {
        return HostStatus::Offline;
    };
    let last_seen = Utc.from_utc_datetime(&parsed);

    if now.signed_duration_since(last_seen) <= Duration::minutes(timeout_minutes) {
        HostStatus::Online
    } else {
        HostStatus::Offline
    }
}

// ── Self identity ───────────────────────────────────────────────────

/// Whether a display name identifies the local machine.
///
/// Used only for inclusion/exclusion filtering during the merge; never
/// stored on the host.
pub fn is_self(display_name: &str, local_short_hostname: &str) -> bool {
    display_name == local_short_hostname
}
