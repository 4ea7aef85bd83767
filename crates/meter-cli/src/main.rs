use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use meter_cli::commands::{context, transcript};
use meter_cli::{Cli, Commands, config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Stdout is reserved for `eval`-able output, so logs go to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Transcript {
            path,
            overrides,
            json,
        }) => {
            let mut config = config::load_from(cli.config.as_deref());
            if let Some(raw) = overrides {
                config = config::apply_overrides(config, raw);
            }
            tracing::debug!(?config, "loaded configuration");

            let format = if *json {
                transcript::Format::Json
            } else {
                transcript::Format::Shell
            };
            let now = meter_core::to_epoch_seconds(Utc::now());
            transcript::run(&mut std::io::stdout().lock(), path.as_deref(), &config, format, now)?;
        }
        Some(Commands::Context { path }) => {
            context::run(&mut std::io::stdout().lock(), path.as_deref(), Utc::now())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
