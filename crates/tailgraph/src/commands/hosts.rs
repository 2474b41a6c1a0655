//! Host listing in human-readable form.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use tailgraph_core::{HostEntry, HostStatus, InventoryGraph};

use crate::cli::{GlobalOpts, HostsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct HostSummary {
    name: String,
    ipv4: Option<String>,
    ipv6: Option<String>,
    os: Option<String>,
    status: HostStatus,
    tags: Vec<String>,
}

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "IPV4")]
    ipv4: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "TAGS")]
    tags: String,
}

fn summarize(entry: &HostEntry) -> HostSummary {
    let host = &entry.host;
    HostSummary {
        name: host.name.clone(),
        ipv4: host.ipv4.clone(),
        ipv6: host.ipv6.clone(),
        os: host
            .attributes
            .get("os")
            .and_then(|v| v.as_str())
            .map(str::to_owned),
        status: host.status,
        tags: host.tags.clone(),
    }
}

fn to_row(summary: &HostSummary, color: bool) -> HostRow {
    let status = if color {
        match summary.status {
            HostStatus::Online => summary.status.as_str().green().to_string(),
            HostStatus::Offline => summary.status.as_str().red().to_string(),
        }
    } else {
        summary.status.as_str().to_owned()
    };

    HostRow {
        name: summary.name.clone(),
        ipv4: summary.ipv4.clone().unwrap_or_default(),
        os: summary.os.clone().unwrap_or_default(),
        status,
        tags: summary.tags.join(","),
    }
}

pub fn handle(
    graph: &InventoryGraph,
    args: &HostsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let summaries: Vec<HostSummary> = match &args.group {
        Some(group) => {
            let members = graph
                .group_members(group)
                .ok_or_else(|| CliError::Validation {
                    field: "group".into(),
                    reason: format!("no such group: {group}"),
                })?;
            members
                .iter()
                .filter_map(|name| graph.host(name))
                .map(summarize)
                .collect()
        }
        None => graph.hosts().map(|(_, entry)| summarize(entry)).collect(),
    };

    let color = output::should_color(&global.color);
    let rendered = output::render_list(
        &global.output,
        &summaries,
        |s| to_row(s, color),
        |s| s.name.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}
