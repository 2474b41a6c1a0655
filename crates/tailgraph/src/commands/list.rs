//! The Ansible dynamic-inventory document.

use serde_json::{Map, Value, json};

use tailgraph_core::InventoryGraph;

use crate::cli::{GlobalOpts, ListArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Build the full dynamic-inventory JSON document.
///
/// Shape follows the Ansible contract: one key per group with a `hosts`
/// list, an `all` group whose children are every other group plus
/// `ungrouped`, and `_meta.hostvars` carrying every host's variables so
/// no per-host callback is needed.
pub fn inventory_document(graph: &InventoryGraph) -> Value {
    let mut doc = Map::new();

    let mut hostvars = Map::new();
    for (name, entry) in graph.hosts() {
        let vars: Map<String, Value> =
            entry.vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        hostvars.insert(name.clone(), Value::Object(vars));
    }
    doc.insert("_meta".into(), json!({ "hostvars": hostvars }));

    let mut children = vec![Value::from("ungrouped")];
    children.extend(graph.groups().map(|(name, _)| Value::from(name.clone())));
    doc.insert("all".into(), json!({ "children": children }));

    for (name, members) in graph.groups() {
        let hosts: Vec<&String> = members.iter().collect();
        doc.insert(name.clone(), json!({ "hosts": hosts }));
    }

    Value::Object(doc)
}

pub fn handle(
    graph: &InventoryGraph,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let doc = inventory_document(graph);

    let compact = args.compact || matches!(global.output, OutputFormat::JsonCompact);
    let rendered = if compact {
        output::render_json_compact(&doc)
    } else {
        output::render_json_pretty(&doc)
    };

    // The document is the contract; quiet only silences diagnostics.
    println!("{rendered}");
    Ok(())
}
