//! Configuration for the tailgraph CLI.
//!
//! TOML file + `TAILGRAPH_`-prefixed environment variables, API-key
//! resolution (env indirection, then plaintext), and translation into the
//! `tailgraph_api` record source.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use tailgraph_api::{ApiClient, DEFAULT_BASE_URL, RecordSource, StatusCli, TransportConfig};
use tailgraph_core::{InventoryOptions, RuleSet};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured (set api_key, api_key_env, or TAILSCALE_API_KEY)")]
    NoCredentials,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transport(#[from] tailgraph_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Where device records come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Tailscale HTTP API (needs a tailnet and an API key).
    #[default]
    Api,
    /// Local `tailscale status --json`.
    Cli,
}

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Which fetch path to use.
    #[serde(default)]
    pub source: SourceKind,

    /// Tailnet name (e.g. "example.com"). Required for the API source.
    pub tailnet: Option<String>,

    /// API key (plaintext — prefer api_key_env).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Override the API base URL.
    pub base_url: Option<String>,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// CLI binary for the local source.
    #[serde(default = "default_cli_program")]
    pub cli_program: String,

    /// Inventory build options.
    #[serde(default)]
    pub options: InventoryOptions,

    /// Constructed rules.
    #[serde(default)]
    pub rules: RuleSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::Api,
            tailnet: None,
            api_key: None,
            api_key_env: None,
            base_url: None,
            timeout: default_timeout(),
            cli_program: default_cli_program(),
            options: InventoryOptions::default(),
            rules: RuleSet::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_cli_program() -> String {
    "tailscale".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "tailgraph", "tailgraph").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tailgraph");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from an explicit file path + environment.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TAILGRAPH_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to an explicit path.
pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API key: named env var, then the explicitly configured key,
/// then the ambient `TAILSCALE_API_KEY`.
///
/// An explicitly configured key (config file or `--api-key`, which the CLI
/// folds into `config.api_key`) must beat the ambient variable, so the
/// ambient lookup comes last.
pub fn resolve_api_key(config: &Config) -> Result<SecretString, ConfigError> {
    resolve_api_key_with(config, |name| std::env::var(name).ok())
}

fn resolve_api_key_with(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = config.api_key_env {
        if let Some(val) = env(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Some(ref key) = config.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    if let Some(val) = env("TAILSCALE_API_KEY") {
        return Ok(SecretString::from(val));
    }

    Err(ConfigError::NoCredentials)
}

// ── Translation to the fetch layer ──────────────────────────────────

/// Build the record source this config describes.
pub fn record_source(config: &Config) -> Result<RecordSource, ConfigError> {
    match config.source {
        SourceKind::Api => {
            let tailnet = config
                .tailnet
                .clone()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| ConfigError::Validation {
                    field: "tailnet".into(),
                    reason: "required for the api source".into(),
                })?;

            let base = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
            let base_url: Url = base.parse().map_err(|_| ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("invalid URL: {base}"),
            })?;

            let api_key = resolve_api_key(config)?;
            let transport = TransportConfig {
                timeout: Duration::from_secs(config.timeout),
            };
            let client = ApiClient::new(base_url, tailnet, api_key, &transport)?;
            Ok(RecordSource::Api(client))
        }
        SourceKind::Cli => Ok(RecordSource::LocalCli(StatusCli::new(
            config.cli_program.clone(),
        ))),
    }
}
