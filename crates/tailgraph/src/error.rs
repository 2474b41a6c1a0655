//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use tailgraph_config::ConfigError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetch ────────────────────────────────────────────────────────
    #[error("Failed to fetch device records: {message}")]
    #[diagnostic(
        code(tailgraph::fetch_failed),
        help(
            "Check network connectivity and the configured source.\n\
             For the cli source, make sure `tailscale` is on PATH."
        )
    )]
    FetchFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(tailgraph::auth_failed),
        help(
            "Verify your API key. Keys are created in the Tailscale admin\n\
             console under Settings > Keys."
        )
    )]
    AuthFailed,

    #[error("No API key configured")]
    #[diagnostic(
        code(tailgraph::no_credentials),
        help(
            "Set TAILSCALE_API_KEY, pass --api-key, or run: tailgraph config init"
        )
    )]
    NoCredentials,

    // ── Rules ────────────────────────────────────────────────────────
    #[error("Constructed rule failed for host '{host}': {message}")]
    #[diagnostic(
        code(tailgraph::rule_failed),
        help("Fix the expression, or drop --strict to skip failing rules.")
    )]
    RuleFailed { host: String, message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Host '{name}' not found in the inventory")]
    #[diagnostic(code(tailgraph::not_found), help("Run: tailgraph hosts"))]
    HostNotFound { name: String },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tailgraph::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration loading failed: {message}")]
    #[diagnostic(
        code(tailgraph::config),
        help("Check the config file syntax. Run: tailgraph config path")
    )]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(tailgraph::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed | Self::NoCredentials => exit_code::AUTH,
            Self::FetchFailed { .. } => exit_code::CONNECTION,
            Self::HostNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error mappings ───────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials => Self::NoCredentials,
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

impl From<tailgraph_core::Error> for CliError {
    fn from(err: tailgraph_core::Error) -> Self {
        if err.is_auth_failure() {
            return Self::AuthFailed;
        }
        match err {
            tailgraph_core::Error::Fetch(e) => Self::FetchFailed {
                message: e.to_string(),
            },
            tailgraph_core::Error::Rule(e) => Self::RuleFailed {
                message: e.source.to_string(),
                host: e.host,
            },
        }
    }
}
