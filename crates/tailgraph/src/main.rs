mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tailgraph_core::{InventoryBuilder, SystemClock, SystemIdentity};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never fetch records
        Command::Config(args) => commands::config_cmd::handle(&args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "tailgraph", &mut std::io::stdout());
            Ok(())
        }

        // Everything else builds the inventory first
        cmd => {
            let cfg = config::load_effective(&cli.global)?;
            let source = tailgraph_config::record_source(&cfg)?;

            let builder = InventoryBuilder::new(&cfg.options, &cfg.rules);
            let (graph, _) = builder.build(&source, &SystemClock, &SystemIdentity).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &graph, &cli.global)
        }
    }
}
