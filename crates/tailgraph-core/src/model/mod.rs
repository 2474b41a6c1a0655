// Domain model: records, hosts, and the inventory aggregate.

pub mod graph;
pub mod host;
pub mod record;

pub use graph::{HostEntry, InventoryGraph};
pub use host::{Host, HostStatus};
pub use record::{NormalizedRecord, RawRecord, is_canonical_key};
