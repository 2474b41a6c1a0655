use thiserror::Error;

/// Top-level error type for the `tailgraph-api` crate.
///
/// Covers every failure mode across both fetch paths: the Tailscale HTTP API
/// and the local `tailscale` CLI. Any of these aborts the run — a fetch
/// failure never produces a partial record batch. `tailgraph-core` maps these
/// into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// API key rejected by the Tailscale API.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success status from the Tailscale API.
    #[error("Tailscale API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Local CLI ───────────────────────────────────────────────────
    /// Failed to spawn the `tailscale` binary.
    #[error("Failed to run `{program}`: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The `tailscale` binary exited with a non-zero status.
    #[error("`{program}` exited with status {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: i32,
        stderr: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates bad or missing credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Api { status: 401 | 403, .. }
        )
    }

    /// Returns `true` if the local `tailscale` binary could not be used.
    pub fn is_cli_unavailable(&self) -> bool {
        matches!(self, Self::CommandSpawn { .. })
    }
}
