use thiserror::Error;

use crate::rules::RuleError;

/// Failures while building an inventory.
///
/// A fetch failure is fatal to the whole run; no partial inventory is ever
/// produced. Rule failures are only fatal under the strict policy.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch device records")]
    Fetch(#[from] tailgraph_api::Error),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl Error {
    /// Whether this failure came from bad credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_auth_failure(),
            Self::Rule(_) => false,
        }
    }
}
