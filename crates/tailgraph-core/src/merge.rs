// Host merging
//
// Deduplicates normalized records into canonical hosts, keyed by display
// name. First write wins: a later record with the same display name is
// dropped whole, even when it carries newer data — that is the upstream
// contract and changing it would silently alter inventories. Self-filtering
// happens here, before any group or variable side effects.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::sanitize_tags;
use crate::config::InventoryOptions;
use crate::model::host::Host;
use crate::model::record::NormalizedRecord;
use crate::normalize::{classify_addresses, extract_addresses, is_self, online_status};

/// Ambient inputs the merge needs: the current time and the local machine's
/// short hostname.
pub struct MergeContext<'a> {
    pub now: DateTime<Utc>,
    pub local_hostname: &'a str,
    pub options: &'a InventoryOptions,
}

/// The display name a record dedups under: the first DNS label of the
/// `name` field when non-empty, else the raw `hostname` field.
pub fn display_name(attrs: &NormalizedRecord) -> Option<String> {
    let from_dns = attrs
        .get("name")
        .and_then(Value::as_str)
        .map(|n| n.split('.').next().unwrap_or(n))
        .filter(|n| !n.is_empty());
    if let Some(name) = from_dns {
        return Some(name.to_owned());
    }

    attrs
        .get("hostname")
        .and_then(Value::as_str)
        .filter(|h| !h.is_empty())
        .map(str::to_owned)
}

/// Build a canonical host from one normalized record.
///
/// Identity fields (`hostname`, `id`) are lifted out of the attribute map;
/// tags are sanitized in place so projection sees the sanitized list; status
/// is computed once, here.
fn build_host(mut attrs: NormalizedRecord, ctx: &MergeContext<'_>) -> Option<Host> {
    let name = display_name(&attrs)?;

    attrs.remove("hostname");
    let id = match attrs.remove("id") {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };

    let addresses = extract_addresses(&attrs);
    let (ipv4, ipv6) = classify_addresses(&addresses);

    let tags = match attrs.get("tags").and_then(Value::as_array) {
        Some(raw) => {
            let clean = sanitize_tags(raw, ctx.options.strip_tag);
            attrs.insert("tags".into(), Value::from(clean.clone()));
            clean
        }
        None => Vec::new(),
    };

    let status = online_status(&attrs, ctx.now, ctx.options.online_timeout);

    Some(Host {
        name,
        id,
        addresses,
        ipv4,
        ipv6,
        tags,
        attributes: attrs,
        status,
    })
}

/// Merge a batch of normalized records into canonical hosts.
///
/// First-seen-wins per display name; self-excluded hosts are skipped before
/// they can cause any side effect; records without any name field are data
/// errors and dropped.
pub fn merge_records(
    records: Vec<NormalizedRecord>,
    ctx: &MergeContext<'_>,
) -> IndexMap<String, Host> {
    let mut hosts: IndexMap<String, Host> = IndexMap::new();

    for attrs in records {
        let Some(host) = build_host(attrs, ctx) else {
            warn!("dropping record without a usable name field");
            continue;
        };

        if !ctx.options.include_self && is_self(&host.name, ctx.local_hostname) {
            debug!(name = %host.name, "excluding the local host");
            continue;
        }

        if hosts.contains_key(&host.name) {
            debug!(name = %host.name, "duplicate display name, keeping the first record");
            continue;
        }

        hosts.insert(host.name.clone(), host);
    }

    hosts
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn ctx<'a>(options: &'a InventoryOptions, local: &'a str) -> MergeContext<'a> {
        MergeContext {
            now: Utc.with_ymd_and_hms(2022, 7, 18, 20, 0, 0).single().expect("valid time"),
            local_hostname: local,
            options,
        }
    }

    fn rec(value: serde_json::Value) -> NormalizedRecord {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn display_name_prefers_first_dns_label() {
        let attrs = rec(json!({ "name": "alpha.example.com", "hostname": "li1196-33" }));
        assert_eq!(display_name(&attrs).as_deref(), Some("alpha"));
    }

    #[test]
    fn display_name_falls_back_to_hostname() {
        let attrs = rec(json!({ "name": "", "hostname": "li1196-33" }));
        assert_eq!(display_name(&attrs).as_deref(), Some("li1196-33"));

        let attrs = rec(json!({ "hostname": "li1196-33" }));
        assert_eq!(display_name(&attrs).as_deref(), Some("li1196-33"));
    }

    #[test]
    fn merge_is_first_seen_wins() {
        let options = InventoryOptions::default();
        let ctx = ctx(&options, "nothing-local");

        let first = rec(json!({ "hostname": "alpha", "os": "linux" }));
        let second = rec(json!({ "hostname": "alpha", "os": "windows" }));
        let hosts = merge_records(vec![first, second], &ctx);

        assert_eq!(hosts.len(), 1);
        assert_eq!(
            hosts["alpha"].attributes.get("os"),
            Some(&json!("linux")),
            "the duplicate must not overwrite the first record"
        );
    }

    #[test]
    fn self_is_excluded_by_default() {
        let options = InventoryOptions::default();
        let ctx = ctx(&options, "alpha");

        let records = vec![
            rec(json!({ "hostname": "alpha" })),
            rec(json!({ "hostname": "beta" })),
        ];
        let hosts = merge_records(records, &ctx);

        assert!(!hosts.contains_key("alpha"));
        assert!(hosts.contains_key("beta"));
    }

    #[test]
    fn self_is_kept_when_requested() {
        let options = InventoryOptions {
            include_self: true,
            ..InventoryOptions::default()
        };
        let ctx = ctx(&options, "alpha");

        let hosts = merge_records(vec![rec(json!({ "hostname": "alpha" }))], &ctx);
        assert!(hosts.contains_key("alpha"));
    }

    #[test]
    fn identity_fields_leave_the_attribute_map() {
        let options = InventoryOptions::default();
        let ctx = ctx(&options, "nothing-local");

        let record = rec(json!({
            "hostname": "alpha",
            "id": "1343255325539688",
            "addresses": ["100.92.75.96", "fd7a:115c:a1e0::1"],
            "tags": ["tag:web", "tag:prod-west"]
        }));
        let hosts = merge_records(vec![record], &ctx);
        let host = &hosts["alpha"];

        assert_eq!(host.id.as_deref(), Some("1343255325539688"));
        assert!(!host.attributes.contains_key("hostname"));
        assert!(!host.attributes.contains_key("id"));
        assert_eq!(host.ipv4.as_deref(), Some("100.92.75.96"));
        assert_eq!(host.ipv6.as_deref(), Some("fd7a:115c:a1e0::1"));
        assert_eq!(host.tags, vec!["web", "prod_west"]);
        // Sanitized tags replace the raw list for projection.
        assert_eq!(host.attributes.get("tags"), Some(&json!(["web", "prod_west"])));
    }
}
