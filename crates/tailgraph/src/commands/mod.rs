//! Command dispatch: bridges CLI args -> inventory graph -> output formatting.

pub mod config_cmd;
pub mod groups;
pub mod host;
pub mod hosts;
pub mod list;

use tailgraph_core::InventoryGraph;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an inventory-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, graph: &InventoryGraph, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => list::handle(graph, &args, global),
        Command::Host(args) => host::handle(graph, &args, global),
        Command::Hosts(args) => hosts::handle(graph, &args, global),
        Command::Groups(args) => groups::handle(graph, &args, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
