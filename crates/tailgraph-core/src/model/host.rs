// Canonical host entity.

use serde::Serialize;

use super::record::NormalizedRecord;

/// Online/offline state, computed once at merge time.
///
/// This is a heuristic (latency presence, else last-seen recency), not a
/// guarantee — a host flapping exactly at the recency boundary will toggle
/// between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Online,
    Offline,
}

impl HostStatus {
    /// The group/variable string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// A deduplicated tailnet host.
///
/// Created exactly once when its display name is first observed during the
/// merge; never mutated afterwards. Variables projected from it live in the
/// inventory graph, not here.
#[derive(Debug, Clone)]
pub struct Host {
    /// Unique display name — first DNS label of the `name` field, falling
    /// back to the raw `hostname` field.
    pub name: String,
    /// Opaque source identifier. Not used for dedup.
    pub id: Option<String>,
    /// Tailnet IP literals in source order.
    pub addresses: Vec<String>,
    /// First address parseable as IPv4, if any.
    pub ipv4: Option<String>,
    /// First address parseable as IPv6, if any.
    pub ipv6: Option<String>,
    /// Sanitized tags in source order.
    pub tags: Vec<String>,
    /// The full normalized attribute map, retained for variable projection.
    pub attributes: NormalizedRecord,
    pub status: HostStatus,
}

impl Host {
    /// The full DNS name from the source, if it carried one.
    pub fn dns_name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(|v| v.as_str())
    }
}
