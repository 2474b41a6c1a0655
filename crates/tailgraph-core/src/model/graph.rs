// The inventory aggregate.
//
// Built incrementally by a single pass over the merged hosts and never
// shared before completion. Mutation contract: host and group creation are
// idempotent, variable writes are last-write-wins, and a host must exist
// before it can join a group or carry variables.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::warn;

use super::host::Host;

/// A host plus its projected inventory variables.
#[derive(Debug, Clone)]
pub struct HostEntry {
    pub host: Host,
    pub vars: IndexMap<String, Value>,
}

/// The normalized inventory: named hosts, flat group membership sets, and
/// per-host variables. IndexMap-backed so iteration (and the JSON rendered
/// from it) is deterministic in insertion order.
#[derive(Debug, Default)]
pub struct InventoryGraph {
    hosts: IndexMap<String, HostEntry>,
    groups: IndexMap<String, IndexSet<String>>,
}

impl InventoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutation contract ───────────────────────────────────────────

    /// Add a host. Idempotent: a host already present is left untouched and
    /// `false` is returned.
    pub fn add_host(&mut self, host: Host) -> bool {
        if self.hosts.contains_key(&host.name) {
            return false;
        }
        let name = host.name.clone();
        self.hosts.insert(
            name,
            HostEntry {
                host,
                vars: IndexMap::new(),
            },
        );
        true
    }

    /// Create a group. Idempotent: creating an existing group is a no-op.
    pub fn add_group(&mut self, name: &str) {
        if !self.groups.contains_key(name) {
            self.groups.insert(name.to_owned(), IndexSet::new());
        }
    }

    /// Add a host to a group, creating the group on first reference.
    ///
    /// The host must already exist; membership of unknown hosts is refused
    /// so every group member always resolves in the host map.
    pub fn add_host_to_group(&mut self, host_name: &str, group_name: &str) {
        if !self.hosts.contains_key(host_name) {
            warn!(host = host_name, group = group_name, "refusing group membership for unknown host");
            return;
        }
        self.groups
            .entry(group_name.to_owned())
            .or_default()
            .insert(host_name.to_owned());
    }

    /// Set a variable on a host. Last-write-wins for repeated keys.
    pub fn set_variable(&mut self, host_name: &str, var_name: &str, value: Value) {
        match self.hosts.get_mut(host_name) {
            Some(entry) => {
                entry.vars.insert(var_name.to_owned(), value);
            }
            None => warn!(host = host_name, var = var_name, "refusing variable for unknown host"),
        }
    }

    // ── Read access ─────────────────────────────────────────────────

    pub fn contains_host(&self, name: &str) -> bool {
        self.hosts.contains_key(name)
    }

    pub fn host(&self, name: &str) -> Option<&HostEntry> {
        self.hosts.get(name)
    }

    pub fn hosts(&self) -> impl Iterator<Item = (&String, &HostEntry)> {
        self.hosts.iter()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// The variables of one host, if it exists.
    pub fn variables(&self, host_name: &str) -> Option<&IndexMap<String, Value>> {
        self.hosts.get(host_name).map(|e| &e.vars)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&String, &IndexSet<String>)> {
        self.groups.iter()
    }

    pub fn group_members(&self, group_name: &str) -> Option<&IndexSet<String>> {
        self.groups.get(group_name)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::host::HostStatus;

    fn host(name: &str) -> Host {
        Host {
            name: name.to_owned(),
            id: None,
            addresses: Vec::new(),
            ipv4: None,
            ipv6: None,
            tags: Vec::new(),
            attributes: serde_json::Map::new(),
            status: HostStatus::Offline,
        }
    }

    #[test]
    fn add_host_is_idempotent_first_wins() {
        let mut graph = InventoryGraph::new();
        let mut first = host("alpha");
        first.id = Some("1".into());
        let mut second = host("alpha");
        second.id = Some("2".into());

        assert!(graph.add_host(first));
        assert!(!graph.add_host(second));
        assert_eq!(
            graph.host("alpha").and_then(|e| e.host.id.as_deref()),
            Some("1")
        );
    }

    #[test]
    fn add_group_is_idempotent() {
        let mut graph = InventoryGraph::new();
        graph.add_host(host("alpha"));
        graph.add_group("linux");
        graph.add_host_to_group("alpha", "linux");
        graph.add_group("linux");

        let members = graph.group_members("linux").expect("group exists");
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn group_membership_requires_existing_host() {
        let mut graph = InventoryGraph::new();
        graph.add_host_to_group("ghost", "linux");
        assert!(
            graph
                .group_members("linux")
                .is_none_or(indexmap::IndexSet::is_empty)
        );
    }

    #[test]
    fn set_variable_is_last_write_wins() {
        let mut graph = InventoryGraph::new();
        graph.add_host(host("alpha"));
        graph.set_variable("alpha", "status", json!("offline"));
        graph.set_variable("alpha", "status", json!("online"));
        assert_eq!(
            graph.variables("alpha").and_then(|v| v.get("status")),
            Some(&json!("online"))
        );
    }
}
