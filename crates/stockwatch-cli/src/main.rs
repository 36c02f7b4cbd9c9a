mod check;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::check::Outcome;

#[derive(Debug, Parser)]
#[command(name = "stockwatch")]
#[command(about = "Store-level stock availability checker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check every target and write a notification when preferred-store stock changed
    Check {
        /// Run the check and print the payload without writing the results file or state
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the current snapshot and its fingerprint without touching state
    Fingerprint,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "run failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let config = stockwatch_core::load_app_config()?;
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command.unwrap_or(Commands::Check { dry_run: false }) {
        Commands::Check { dry_run } => check::run_check_command(&config, dry_run).await,
        Commands::Fingerprint => {
            check::print_fingerprint(&config).await?;
            Ok(Outcome::Reported)
        }
    }
}

#[cfg(test)]
mod tests;
