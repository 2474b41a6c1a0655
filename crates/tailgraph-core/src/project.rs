// Variable projection
//
// Turns a merged host into its inventory variable mapping: every normalized
// attribute passes through structurally, then the computed variables are
// overlaid on top and win over any same-named attribute.

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{AnsibleHostSource, InventoryOptions};
use crate::model::host::Host;

/// Project a host's variables.
///
/// The `ansible_host` connection variable is always written; when the
/// configured source is unset for this host it is projected as null rather
/// than omitted, so consumers see the selection was made.
pub fn project(host: &Host, options: &InventoryOptions) -> IndexMap<String, Value> {
    let mut vars: IndexMap<String, Value> = host
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if let Some(ipv4) = &host.ipv4 {
        vars.insert("ipv4".into(), Value::from(ipv4.clone()));
    }
    if let Some(ipv6) = &host.ipv6 {
        vars.insert("ipv6".into(), Value::from(ipv6.clone()));
    }

    let connection = match options.ansible_host {
        AnsibleHostSource::Ipv4 => host.ipv4.clone(),
        AnsibleHostSource::Ipv6 => host.ipv6.clone(),
        AnsibleHostSource::Dns => host.dns_name().map(str::to_owned),
        AnsibleHostSource::HostName => Some(host.name.clone()),
    };
    vars.insert(
        "ansible_host".into(),
        connection.map_or(Value::Null, Value::from),
    );

    vars.insert("status".into(), Value::from(host.status.as_str()));

    if options.tag_groups && !host.tags.is_empty() {
        vars.insert("tags".into(), Value::from(host.tags.clone()));
    }

    vars
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::host::HostStatus;
    use crate::model::record::NormalizedRecord;

    fn sample_host() -> Host {
        let attributes: NormalizedRecord = match json!({
            "name": "alpha.example.com",
            "os": "linux",
            "addresses": ["100.92.75.96"],
            "client_version": "1.28.0"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        Host {
            name: "alpha".into(),
            id: Some("1343255325539688".into()),
            addresses: vec!["100.92.75.96".into()],
            ipv4: Some("100.92.75.96".into()),
            ipv6: None,
            tags: vec!["web".into()],
            attributes,
            status: HostStatus::Online,
        }
    }

    #[test]
    fn attributes_pass_through_structurally() {
        let vars = project(&sample_host(), &InventoryOptions::default());
        assert_eq!(vars.get("os"), Some(&json!("linux")));
        assert_eq!(vars.get("client_version"), Some(&json!("1.28.0")));
        assert_eq!(vars.get("addresses"), Some(&json!(["100.92.75.96"])));
    }

    #[test]
    fn computed_variables_win_over_attributes() {
        let mut host = sample_host();
        host.attributes.insert("status".into(), json!("bogus"));
        host.attributes.insert("ipv4".into(), json!("1.2.3.4"));

        let vars = project(&host, &InventoryOptions::default());
        assert_eq!(vars.get("status"), Some(&json!("online")));
        assert_eq!(vars.get("ipv4"), Some(&json!("100.92.75.96")));
    }

    #[test]
    fn connection_variable_follows_the_configured_source() {
        let host = sample_host();

        let by_name = project(&host, &InventoryOptions::default());
        assert_eq!(by_name.get("ansible_host"), Some(&json!("alpha")));

        let opts = InventoryOptions {
            ansible_host: AnsibleHostSource::Ipv4,
            ..InventoryOptions::default()
        };
        let by_ipv4 = project(&host, &opts);
        assert_eq!(by_ipv4.get("ansible_host"), Some(&json!("100.92.75.96")));

        let opts = InventoryOptions {
            ansible_host: AnsibleHostSource::Dns,
            ..InventoryOptions::default()
        };
        let by_dns = project(&host, &opts);
        assert_eq!(by_dns.get("ansible_host"), Some(&json!("alpha.example.com")));
    }

    #[test]
    fn unset_connection_source_projects_null_not_omitted() {
        let host = sample_host();
        let opts = InventoryOptions {
            ansible_host: AnsibleHostSource::Ipv6,
            ..InventoryOptions::default()
        };
        let vars = project(&host, &opts);
        assert_eq!(vars.get("ansible_host"), Some(&Value::Null));
    }

    #[test]
    fn tags_variable_follows_the_tag_groups_toggle() {
        let host = sample_host();

        let on = project(&host, &InventoryOptions::default());
        assert_eq!(on.get("tags"), Some(&json!(["web"])));

        let opts = InventoryOptions {
            tag_groups: false,
            ..InventoryOptions::default()
        };
        let off = project(&host, &opts);
        // Attribute pass-through may still carry tags, but the computed
        // overlay must not add the variable.
        assert!(!off.contains_key("tags"));

        let mut untagged = sample_host();
        untagged.tags.clear();
        let vars = project(&untagged, &InventoryOptions::default());
        assert!(!vars.contains_key("tags"));
    }
}
