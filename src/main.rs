//! rembot command-line entry point.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::commands::{self, load_settings};
use cli::{Cli, Commands};
use rembot_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_str(), cli.json_logs);

    match cli.command {
        Commands::Run(args) => commands::run::run(args, load_settings(&cli.config)?).await,
        Commands::Replay(args) => commands::replay::run(args, load_settings(&cli.config)?).await,
        Commands::ValidateConfig => commands::validate::run(&cli.config).await,
    }
}
