// Tailscale HTTP API client
//
// Wraps `reqwest::Client` with tailnet-scoped URL construction, basic-auth
// credential injection, and envelope unwrapping. The API authenticates with
// the key as the basic-auth username and an empty password.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{DevicesEnvelope, RawRecord};
use crate::transport::TransportConfig;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tailscale.com";

/// Client for the Tailscale v2 HTTP API.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tailnet: String,
    api_key: SecretString,
}

impl ApiClient {
    /// Create a new API client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        tailnet: String,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            tailnet,
            api_key,
        })
    }

    /// Create an API client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        tailnet: String,
        api_key: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            tailnet,
            api_key,
        }
    }

    /// The tailnet this client is scoped to.
    pub fn tailnet(&self) -> &str {
        &self.tailnet
    }

    /// Build the tailnet-scoped devices URL: `{base}/api/v2/tailnet/{tailnet}/devices`.
    fn devices_url(&self) -> Result<Url, Error> {
        let path = format!("api/v2/tailnet/{}/devices", self.tailnet);
        let mut url = self.base_url.join(&path)?;
        url.set_query(Some("fields=all"));
        Ok(url)
    }

    /// List every device in the tailnet as raw records.
    ///
    /// `GET /api/v2/tailnet/{tailnet}/devices?fields=all`
    ///
    /// Any transport or API failure aborts the whole fetch — there are no
    /// partial results and no retries at this layer.
    pub async fn list_devices(&self) -> Result<Vec<RawRecord>, Error> {
        let url = self.devices_url()?;
        debug!(%url, "listing tailnet devices");

        let resp = self
            .http
            .get(url)
            .basic_auth(self.api_key.expose_secret(), Some(""))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: "API key rejected by the Tailscale API".into(),
            });
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: DevicesEnvelope =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        debug!(count = envelope.devices.len(), "fetched device records");
        Ok(envelope.devices)
    }
}
