//! CLI-side configuration: file + environment + flag overrides.

use tailgraph_config::{Config, SourceKind};

use crate::cli::{GlobalOpts, SourceArg};
use crate::error::CliError;

/// Load the config file and fold the global CLI flags on top.
pub fn load_effective(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = match &global.config {
        Some(path) => tailgraph_config::load_config_from(path)?,
        None => tailgraph_config::load_config()?,
    };

    if let Some(tailnet) = &global.tailnet {
        cfg.tailnet = Some(tailnet.clone());
    }
    if let Some(key) = &global.api_key {
        cfg.api_key = Some(key.clone());
    }
    if let Some(source) = global.source {
        cfg.source = match source {
            SourceArg::Api => SourceKind::Api,
            SourceArg::Cli => SourceKind::Cli,
        };
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.strict {
        cfg.options.strict = true;
    }

    Ok(cfg)
}
