// Fetch-path response types
//
// Device records are deliberately loose: the Tailscale API returns well over
// thirty fields per device and grows new ones across releases, so records
// travel as raw JSON maps and field naming is resolved downstream by the
// normalizer. Only the envelope is typed.

use serde::Deserialize;
use serde_json::Value;

/// A raw device/peer record in the source's native naming convention.
///
/// Keys may mix PascalCase (CLI status path) and camelCase (HTTP API path);
/// both shapes feed the same normalization pipeline. Ephemeral — discarded
/// once normalized.
pub type RawRecord = serde_json::Map<String, Value>;

/// Envelope returned by `GET /api/v2/tailnet/{tailnet}/devices`.
///
/// ```json
/// { "devices": [ { "addresses": [...], "hostname": "...", ... }, ... ] }
/// ```
#[derive(Debug, Deserialize)]
pub struct DevicesEnvelope {
    #[serde(default)]
    pub devices: Vec<RawRecord>,
}

/// Top-level shape of `tailscale status --json`.
///
/// `Self` describes the local node; `Peer` maps node public keys to peer
/// records. Both use PascalCase keys (`HostName`, `DNSName`, `TailscaleIPs`)
/// that the status adapter rewrites into the API record shape.
#[derive(Debug, Deserialize)]
pub struct StatusSnapshot {
    #[serde(rename = "Self")]
    pub self_node: Option<RawRecord>,
    #[serde(rename = "Peer", default)]
    pub peers: serde_json::Map<String, Value>,
}
