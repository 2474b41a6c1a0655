// tailgraph-api: fetch boundaries for tailnet device records.
//
// Two independent fetch paths — the Tailscale HTTP API and the local
// `tailscale` CLI — each adapted to a common loose `RawRecord` shape.
// Everything downstream of the fetch lives in `tailgraph-core`.

pub mod api;
pub mod error;
pub mod models;
pub mod source;
pub mod status;
pub mod transport;

pub use api::{ApiClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{DevicesEnvelope, RawRecord, StatusSnapshot};
pub use source::RecordSource;
pub use status::StatusCli;
pub use transport::TransportConfig;
