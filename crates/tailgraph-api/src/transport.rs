// Shared transport configuration for building reqwest::Client instances.
//
// The Tailscale API sits behind a public CA, so there is no TLS knob here —
// just timeout and user-agent. Credentials are applied per request (basic
// auth with the API key as username) rather than baked into the client.

use std::time::Duration;

/// Transport configuration for the HTTP fetch path.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("tailgraph/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
