//! Single-host variable lookup (the Ansible `--host` contract).

use tailgraph_core::InventoryGraph;

use crate::cli::{GlobalOpts, HostArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(
    graph: &InventoryGraph,
    args: &HostArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entry = graph.host(&args.name).ok_or_else(|| CliError::HostNotFound {
        name: args.name.clone(),
    })?;

    let rendered = match global.output {
        OutputFormat::JsonCompact => output::render_json_compact(&entry.vars),
        OutputFormat::Plain => entry
            .vars
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => output::render_json_pretty(&entry.vars),
    };

    println!("{rendered}");
    Ok(())
}
