// tailgraph-core: inventory pipeline between tailgraph-api and consumers.

pub mod build;
pub mod classify;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod project;
pub mod rules;

// ── Primary re-exports ──────────────────────────────────────────────
pub use build::InventoryBuilder;
pub use classify::TagAccumulator;
pub use config::{AnsibleHostSource, InventoryOptions};
pub use engine::JinjaEngine;
pub use env::{Clock, LocalIdentity, SystemClock, SystemIdentity};
pub use error::Error;
pub use rules::{EngineError, ExpressionEngine, KeyedGroup, RuleError, RuleSet};

// Re-export model types at the crate root for ergonomics.
pub use model::{Host, HostEntry, HostStatus, InventoryGraph, NormalizedRecord, RawRecord};
