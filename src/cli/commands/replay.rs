//! Offline replay of historical klines.

use anyhow::{Context, Result};
use rembot_config::BotSettings;
use rembot_data::{load_csv, ResultsLedger};
use rembot_engine::{PerformanceTracker, RemBot};
use rembot_exchange::{PaperExchange, TargetCalculator};
use std::sync::Arc;
use tracing::info;

use crate::cli::{OutputFormat, ReplayArgs};

pub async fn run(args: ReplayArgs, settings: BotSettings) -> Result<()> {
    let path = args.data.to_string_lossy();
    let candles = load_csv(&path).with_context(|| format!("Failed to load klines from {}", path))?;
    info!("Loaded {} candles from {}", candles.len(), path);

    let targets = TargetCalculator::from_settings(&settings.position)
        .context("Invalid position settings")?;
    let paper = Arc::new(PaperExchange::new(candles, targets).context("Not enough klines to replay")?);

    let mut tracker = PerformanceTracker::new(settings.position.symbol.clone());
    if let Some(ledger) = &args.ledger {
        tracker = tracker.with_ledger(ResultsLedger::new(ledger));
    }

    let mut bot = RemBot::start(&settings, paper.clone(), tracker)
        .await
        .context("Failed to start replay")?;

    let limit = args.ticks.unwrap_or(u64::MAX);
    while bot.ticks() < limit && paper.remaining().await > 0 {
        bot.tick().await;
    }
    info!("Replay finished after {} ticks in state {}", bot.ticks(), bot.state());

    let summary = bot.tracker().summary();
    match args.output {
        OutputFormat::Json => println!("{}", summary.to_json()?),
        OutputFormat::Text => println!("{}", summary.report()),
    }
    Ok(())
}
