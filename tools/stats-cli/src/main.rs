//! Weekly stats dashboard CLI
//!
//! Loads the configured player/team CSVs and prints leaderboards, player
//! series and team matchup series.

mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing::info;

use cli::{Cli, CliHandler};
use league_dashboard::{initialize_logging_with_config, Status};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = cli.resolve_config().context("Failed to load configuration")?;
    initialize_logging_with_config(&config.logging)?;
    info!("stats-cli v{} starting", env!("CARGO_PKG_VERSION"));

    let handler = CliHandler::new(config, cli.json);
    if let Err(e) = handler.handle_command(cli.command).await {
        eprintln!("{}", format!("❌ {}", Status::failed(&e)).red());
        std::process::exit(1);
    }

    Ok(())
}
