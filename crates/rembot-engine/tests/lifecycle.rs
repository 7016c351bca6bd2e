//! End-to-end runs of the bot against scripted and replayed markets.

use async_trait::async_trait;
use rembot_config::{BotSettings, PositionSettings};
use rembot_core::error::ExchangeError;
use rembot_core::traits::ExchangeAdapter;
use rembot_core::types::{Candle, MarketSnapshot, PositionSide, TargetPrices};
use rembot_data::ResultsLedger;
use rembot_engine::{PerformanceTracker, PositionState, RemBot};
use rembot_exchange::{PaperExchange, TargetCalculator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

struct MarketScript {
    snapshots: Mutex<VecDeque<MarketSnapshot>>,
}

impl MarketScript {
    fn new(snapshots: Vec<MarketSnapshot>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
        }
    }
}

#[async_trait]
impl ExchangeAdapter for MarketScript {
    async fn fetch_indicators(&self) -> Result<MarketSnapshot, ExchangeError> {
        self.snapshots
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ExchangeError::DataExhausted { ticks: 0 })
    }

    async fn enter_long(&self, price: f64) -> Result<TargetPrices, ExchangeError> {
        Ok(TargetPrices::new(price + 1.0, price - 1.0))
    }

    async fn enter_short(&self, price: f64) -> Result<TargetPrices, ExchangeError> {
        Ok(TargetPrices::new(price - 1.0, price + 1.0))
    }

    fn name(&self) -> &str {
        "script"
    }
}

fn snapshot(price: f64, macd_fast: f64, macd_signal: f64, ema_100: f64, rsi_6: f64) -> MarketSnapshot {
    MarketSnapshot::new("2025-08-29 00:00", price, macd_fast, macd_signal, ema_100, rsi_6)
}

#[tokio::test]
async fn long_position_round_trip_is_recorded() {
    let dir = std::env::temp_dir().join(format!("rembot-lifecycle-{}", uuid::Uuid::new_v4()));
    let ledger_path = dir.join("results.csv");

    let long_trigger = snapshot(90.0, -1.0, -2.0, 100.0, 60.0);
    let exchange = Arc::new(MarketScript::new(vec![
        // startup: above the EMA, so shorts are blocked
        snapshot(200.0, 0.0, 0.0, 150.0, 50.0),
        long_trigger.clone(),
        snapshot(90.5, 0.0, 0.0, 100.0, 50.0),
        snapshot(91.5, 0.0, 0.0, 100.0, 50.0),
        long_trigger.clone(),
    ]));
    let tracker = PerformanceTracker::new("ETHUSDT").with_ledger(ResultsLedger::new(&ledger_path));
    let mut bot = RemBot::start(&BotSettings::default(), exchange, tracker)
        .await
        .unwrap();
    assert!(bot.bookkeeper().is_short_blocked());

    bot.tick().await;
    assert!(matches!(bot.state(), PositionState::LongActive(_)));
    assert!(bot.bookkeeper().is_long_blocked());
    assert_eq!(bot.bookkeeper().position_snapshot(), Some(&long_trigger));

    bot.tick().await;
    assert!(matches!(bot.state(), PositionState::LongActive(_)));

    bot.tick().await;
    assert!(bot.state().is_flat());
    assert!(!bot.bookkeeper().is_long_blocked());
    assert_eq!(bot.tracker().wins(), 1);

    // Long is unblocked again, so the next trigger re-enters.
    bot.tick().await;
    let position = bot.state().position().unwrap();
    assert_eq!(position.side, PositionSide::Long);

    let contents = std::fs::read_to_string(&ledger_path).unwrap();
    std::fs::remove_dir_all(&dir).ok();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("ETHUSDT,LONG,"));
    assert!(lines[1].contains(",WIN,"));
}

#[tokio::test]
async fn paper_replay_runs_until_data_is_exhausted() {
    let candles: Vec<Candle> = (0..300)
        .map(|i| {
            let close = 2000.0 + 40.0 * (i as f64 / 9.0).sin() + 15.0 * (i as f64 / 2.3).cos();
            Candle::new(i * 900_000, close, close + 3.0, close - 3.0, close, 100.0)
        })
        .collect();
    let targets = TargetCalculator::from_settings(&PositionSettings::default()).unwrap();
    let paper = Arc::new(PaperExchange::new(candles, targets).unwrap());

    let mut bot = RemBot::start(
        &BotSettings::default(),
        paper.clone(),
        PerformanceTracker::new("ETHUSDT"),
    )
    .await
    .unwrap();

    while paper.remaining().await > 0 {
        bot.tick().await;
    }
    assert_eq!(bot.ticks(), 200);

    let entries = paper.entries().await.len();
    let closed = bot.tracker().total();
    let still_open = usize::from(!bot.state().is_flat());
    assert_eq!(entries, closed + still_open);

    // Further ticks fail to fetch and leave the state alone.
    let before = bot.state().clone();
    bot.tick().await;
    assert_eq!(bot.state(), &before);
}
