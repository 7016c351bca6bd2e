//! Live loop against Binance futures.

use anyhow::{Context, Result};
use rembot_config::BotSettings;
use rembot_engine::{PerformanceTracker, RemBot};
use rembot_exchange::{BinanceConfig, BinanceFutures, TargetCalculator};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, settings: BotSettings) -> Result<()> {
    if !settings.runtime.test_mode {
        warn!("Test mode is off: orders will be sent to the exchange");
    }

    let targets = TargetCalculator::from_settings(&settings.position)
        .context("Invalid position settings")?;
    let mut config = BinanceConfig::from_settings(&settings);
    if let Some(url) = args.base_url {
        config = config.with_base_url(url);
    }
    let exchange = BinanceFutures::new(config, targets).context("Failed to create Binance client")?;

    let tracker = PerformanceTracker::from_settings(&settings);
    let mut bot = RemBot::start(&settings, Arc::new(exchange), tracker)
        .await
        .context("Failed to start RemBot")?;

    bot.run(shutdown_signal()).await;

    let summary = bot.tracker().summary();
    info!(
        "Stopped with {} wins and {} losses",
        summary.wins, summary.losses
    );
    println!("{}", summary.report());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
