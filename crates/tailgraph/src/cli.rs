//! Clap derive structures for the `tailgraph` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tailgraph -- Ansible dynamic inventory for Tailscale tailnets
#[derive(Debug, Parser)]
#[command(
    name = "tailgraph",
    version,
    about = "Build Ansible inventories from a Tailscale tailnet",
    long_about = "Fetches device records from the Tailscale API (or the local\n\
        `tailscale status` CLI), normalizes them, and emits an Ansible\n\
        dynamic-inventory JSON document or human-readable tables.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file path (defaults to the platform config dir)
    #[arg(long, env = "TAILGRAPH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Tailnet name (overrides config)
    #[arg(long, short = 't', env = "TAILSCALE_TAILNET", global = true)]
    pub tailnet: Option<String>,

    /// Tailscale API key
    #[arg(long, env = "TAILSCALE_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Record source (overrides config)
    #[arg(long, global = true)]
    pub source: Option<SourceArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TAILGRAPH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "TAILGRAPH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Abort on the first constructed-rule error
    #[arg(long, global = true)]
    pub strict: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// CLI-side mirror of the configured record source.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    /// Tailscale HTTP API
    Api,
    /// Local `tailscale status --json`
    Cli,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Emit the full Ansible dynamic-inventory JSON document
    #[command(alias = "ls")]
    List(ListArgs),

    /// Print the variables of a single host
    Host(HostArgs),

    /// List hosts in a human-readable form
    Hosts(HostsArgs),

    /// List groups and their members
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Per-Command Args ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Emit compact JSON regardless of --output
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Args)]
pub struct HostArgs {
    /// Host display name
    pub name: String,
}

#[derive(Debug, Args)]
pub struct HostsArgs {
    /// Only hosts in this group
    #[arg(long, short = 'g')]
    pub group: Option<String>,
}

#[derive(Debug, Args)]
pub struct GroupsArgs {
    /// Include empty groups
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file
    Init,
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
