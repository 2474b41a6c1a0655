// ── Inventory build options ──
//
// These types describe *how* the graph is derived from fetched records.
// They carry no credentials and never touch disk — tailgraph-config loads
// files/env and hands an `InventoryOptions` in.

use serde::{Deserialize, Serialize};

/// Source of the `ansible_host` connection-address variable.
///
/// A closed enumeration: the single projection site matches exhaustively, so
/// adding a variant is a compile error until it is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsibleHostSource {
    /// The host's first IPv4 literal.
    Ipv4,
    /// The host's first IPv6 literal.
    Ipv6,
    /// The full DNS name from the source record.
    Dns,
    /// The canonical display name (default).
    #[default]
    HostName,
}

/// Options controlling normalization, grouping, and projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryOptions {
    /// Include the local machine in the inventory.
    pub include_self: bool,

    /// Where the `ansible_host` variable comes from.
    pub ansible_host: AnsibleHostSource,

    /// Strip the leading `tag:` prefix during tag sanitization.
    pub strip_tag: bool,

    /// Create a group per operating system.
    pub os_groups: bool,

    /// Create `online` / `offline` groups.
    pub include_online_offline_groups: bool,

    /// Recency window, in minutes, for the last-seen online heuristic.
    pub online_timeout: i64,

    /// Create a group per sanitized tag.
    pub tag_groups: bool,

    /// Abort the run on the first constructed-rule error instead of
    /// skipping the failing rule/host.
    pub strict: bool,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            include_self: false,
            ansible_host: AnsibleHostSource::HostName,
            strip_tag: true,
            os_groups: true,
            include_online_offline_groups: true,
            online_timeout: 10,
            tag_groups: true,
            strict: false,
        }
    }
}
