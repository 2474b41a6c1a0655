//! Group listing.

use serde::Serialize;
use tabled::Tabled;

use tailgraph_core::InventoryGraph;

use crate::cli::{GlobalOpts, GroupsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct GroupSummary {
    name: String,
    members: Vec<String>,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "GROUP")]
    name: String,
    #[tabled(rename = "HOSTS")]
    count: usize,
    #[tabled(rename = "MEMBERS")]
    members: String,
}

fn to_row(summary: &GroupSummary) -> GroupRow {
    GroupRow {
        name: summary.name.clone(),
        count: summary.members.len(),
        members: summary.members.join(","),
    }
}

pub fn handle(
    graph: &InventoryGraph,
    args: &GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let summaries: Vec<GroupSummary> = graph
        .groups()
        .filter(|(_, members)| args.all || !members.is_empty())
        .map(|(name, members)| GroupSummary {
            name: name.clone(),
            members: members.iter().cloned().collect(),
        })
        .collect();

    let rendered = output::render_list(&global.output, &summaries, to_row, |s| s.name.clone());
    output::print_output(&rendered, global.quiet);
    Ok(())
}
