// Tag sanitization and static group classification
//
// Derives the rule-independent group memberships (OS, online/offline, tags)
// from a merged host. The set of every sanitized tag observed across hosts
// is threaded through explicitly as an accumulator rather than held as
// ambient state.

use indexmap::IndexSet;
use serde_json::Value;
use tracing::warn;

use crate::config::InventoryOptions;
use crate::model::host::Host;

/// Every sanitized tag observed across the classification pass, in first-seen
/// order. Returned alongside the graph.
pub type TagAccumulator = IndexSet<String>;

/// Sanitize one raw tag into a group-safe name.
///
/// Optionally strips the literal `tag:` prefix, then replaces every `:` and
/// `-` with `_`. An empty result is a data error — the caller drops the tag
/// (the host itself is still processed) and must never index by empty key.
pub fn sanitize_tag(tag: &str, strip_prefix: bool) -> Option<String> {
    let stripped = if strip_prefix {
        tag.strip_prefix("tag:").unwrap_or(tag)
    } else {
        tag
    };
    let clean = stripped.replace([':', '-'], "_");
    if clean.is_empty() {
        None
    } else {
        Some(clean)
    }
}

/// Sanitize a host's raw tag list, dropping tags that sanitize to empty.
pub fn sanitize_tags(raw: &[Value], strip_prefix: bool) -> Vec<String> {
    let mut clean = Vec::with_capacity(raw.len());
    for value in raw {
        let Some(tag) = value.as_str() else {
            warn!(?value, "dropping non-string tag");
            continue;
        };
        match sanitize_tag(tag, strip_prefix) {
            Some(s) => clean.push(s),
            None => warn!(tag, "dropping tag that sanitized to empty"),
        }
    }
    clean
}

/// The static groups a host belongs to, independent of constructed rules.
///
/// Each rule family is independently toggleable. Observed tags are recorded
/// into `all_tags` so callers can pre-create tag groups; group creation
/// itself is idempotent, so ordering across hosts does not matter.
pub fn classify(
    host: &Host,
    options: &InventoryOptions,
    all_tags: &mut TagAccumulator,
) -> Vec<String> {
    let mut groups = Vec::new();

    if options.os_groups {
        let os = host
            .attributes
            .get("os")
            .and_then(Value::as_str)
            .filter(|os| !os.is_empty());
        if let Some(os) = os {
            groups.push(os.to_lowercase());
        }
    }

    if options.include_online_offline_groups {
        groups.push(host.status.as_str().to_owned());
    }

    if options.tag_groups {
        for tag in &host.tags {
            all_tags.insert(tag.clone());
            groups.push(tag.clone());
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::host::HostStatus;

    fn host_with(os: Option<&str>, status: HostStatus, tags: &[&str]) -> Host {
        let mut attributes = serde_json::Map::new();
        if let Some(os) = os {
            attributes.insert("os".into(), json!(os));
        }
        Host {
            name: "alpha".into(),
            id: None,
            addresses: Vec::new(),
            ipv4: None,
            ipv6: None,
            tags: tags.iter().map(|&t| t.to_owned()).collect(),
            attributes,
            status,
        }
    }

    #[test]
    fn tag_sanitization_with_and_without_prefix_strip() {
        assert_eq!(sanitize_tag("tag:prod-west", true).as_deref(), Some("prod_west"));
        assert_eq!(
            sanitize_tag("tag:prod-west", false).as_deref(),
            Some("tag_prod_west")
        );
    }

    #[test]
    fn tag_sanitizing_to_empty_is_dropped() {
        assert_eq!(sanitize_tag("tag:", true), None);
        assert_eq!(sanitize_tag("", false), None);

        let clean = sanitize_tags(&[json!("tag:"), json!("tag:web"), json!(7)], true);
        assert_eq!(clean, vec!["web".to_owned()]);
    }

    #[test]
    fn os_group_is_lowercased() {
        let host = host_with(Some("Linux"), HostStatus::Online, &[]);
        let mut tags = TagAccumulator::new();
        let groups = classify(&host, &InventoryOptions::default(), &mut tags);
        assert!(groups.contains(&"linux".to_owned()));
    }

    #[test]
    fn all_rule_families_toggle_independently() {
        let host = host_with(Some("linux"), HostStatus::Offline, &["web"]);

        let all_off = InventoryOptions {
            os_groups: false,
            include_online_offline_groups: false,
            tag_groups: false,
            ..InventoryOptions::default()
        };
        let mut tags = TagAccumulator::new();
        assert!(classify(&host, &all_off, &mut tags).is_empty());
        assert!(tags.is_empty());

        let mut tags = TagAccumulator::new();
        let groups = classify(&host, &InventoryOptions::default(), &mut tags);
        assert_eq!(groups, vec!["linux", "offline", "web"]);
        assert!(tags.contains("web"));
    }

    #[test]
    fn missing_os_field_is_not_an_error() {
        let host = host_with(None, HostStatus::Online, &[]);
        let mut tags = TagAccumulator::new();
        let groups = classify(&host, &InventoryOptions::default(), &mut tags);
        assert_eq!(groups, vec!["online"]);
    }
}
