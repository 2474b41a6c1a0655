//! Config subcommand handlers.

use tailgraph_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(tailgraph_config::config_path);
            if path.exists() {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("config already exists at {}", path.display()),
                });
            }

            let starter = Config {
                tailnet: global.tailnet.clone(),
                ..Config::default()
            };
            tailgraph_config::save_config_to(&starter, &path)?;
            if !global.quiet {
                eprintln!("Wrote starter config to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = config::load_effective(global)?;
            // Never echo a key, even a plaintext-configured one.
            if cfg.api_key.is_some() {
                cfg.api_key = Some("<redacted>".into());
            }
            let rendered = output::render_json_pretty(&cfg);
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(tailgraph_config::config_path);
            println!("{}", path.display());
            Ok(())
        }
    }
}
