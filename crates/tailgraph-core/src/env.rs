// Ambient inputs behind seams, so the pipeline is deterministic under test.

use chrono::{DateTime, Utc};
use gethostname::gethostname;

/// Source of "now" for the online heuristic.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of the local machine's short hostname, used only for
/// self-exclusion.
pub trait LocalIdentity {
    fn short_hostname(&self) -> String;
}

/// The operating system's hostname, truncated at the first dot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl LocalIdentity for SystemIdentity {
    fn short_hostname(&self) -> String {
        let full = gethostname().to_string_lossy().into_owned();
        full.split('.').next().unwrap_or(&full).to_owned()
    }
}
