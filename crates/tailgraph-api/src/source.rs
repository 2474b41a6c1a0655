// Fetcher boundary
//
// The two fetch paths produce different raw schemas; each adapter emits the
// common `RawRecord` shape before any record reaches the normalizer. The
// tagged enum keeps the choice explicit at the boundary instead of hiding it
// behind dynamic dispatch.

use crate::api::ApiClient;
use crate::error::Error;
use crate::models::RawRecord;
use crate::status::StatusCli;

/// Where raw device records come from.
#[derive(Debug)]
pub enum RecordSource {
    /// Tailscale HTTP API with basic-auth API key.
    Api(ApiClient),
    /// Local `tailscale status --json` invocation.
    LocalCli(StatusCli),
}

impl RecordSource {
    /// Fetch one batch of raw records.
    ///
    /// Any failure is fatal to the run — no partial batches are returned.
    pub async fn fetch(&self) -> Result<Vec<RawRecord>, Error> {
        match self {
            Self::Api(client) => client.list_devices().await,
            Self::LocalCli(cli) => cli.list_devices().await,
        }
    }

    /// Human-readable label for logs and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Api(_) => "api",
            Self::LocalCli(_) => "cli",
        }
    }
}
