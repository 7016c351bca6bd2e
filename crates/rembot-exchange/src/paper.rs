//! Offline replay exchange for dry runs over historical klines.

use async_trait::async_trait;
use rembot_core::error::{ExchangeError, IndicatorError};
use rembot_core::traits::ExchangeAdapter;
use rembot_core::types::{Candle, MarketSnapshot, PositionSide, TargetPrices};
use rembot_indicators::SnapshotBuilder;
use tokio::sync::Mutex;
use tracing::debug;

use crate::targets::TargetCalculator;

/// An entry recorded by the replay exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperEntry {
    pub side: PositionSide,
    pub price: f64,
    pub targets: TargetPrices,
}

#[derive(Debug)]
struct ReplayState {
    /// Exclusive end of the next window
    next: usize,
    ticks: usize,
    entries: Vec<PaperEntry>,
}

/// Replays candles one per fetch. Exits are detected by the default price comparison.
pub struct PaperExchange {
    candles: Vec<Candle>,
    builder: SnapshotBuilder,
    targets: TargetCalculator,
    state: Mutex<ReplayState>,
}

impl PaperExchange {
    /// Create a replay over `candles`, ordered oldest first.
    ///
    /// The first fetch sees exactly the warm-up window; every later fetch
    /// adds one candle.
    pub fn new(candles: Vec<Candle>, targets: TargetCalculator) -> Result<Self, ExchangeError> {
        let builder = SnapshotBuilder::new();
        let warmup = builder.warmup();
        if candles.len() < warmup {
            return Err(IndicatorError::InsufficientData {
                required: warmup,
                available: candles.len(),
            }
            .into());
        }

        Ok(Self {
            candles,
            builder,
            targets,
            state: Mutex::new(ReplayState {
                next: warmup,
                ticks: 0,
                entries: Vec::new(),
            }),
        })
    }

    /// Snapshots left before the data runs out.
    pub async fn remaining(&self) -> usize {
        let state = self.state.lock().await;
        (self.candles.len() + 1).saturating_sub(state.next)
    }

    /// Entries opened so far.
    pub async fn entries(&self) -> Vec<PaperEntry> {
        self.state.lock().await.entries.clone()
    }

    async fn enter(&self, side: PositionSide, price: f64) -> Result<TargetPrices, ExchangeError> {
        let targets = self.targets.targets(side, price)?;
        debug!(%side, price, tp = targets.take_profit, sl = targets.stop_loss, "Paper entry");
        self.state.lock().await.entries.push(PaperEntry {
            side,
            price,
            targets,
        });
        Ok(targets)
    }
}

#[async_trait]
impl ExchangeAdapter for PaperExchange {
    async fn fetch_indicators(&self) -> Result<MarketSnapshot, ExchangeError> {
        let mut state = self.state.lock().await;
        if state.next > self.candles.len() {
            return Err(ExchangeError::DataExhausted { ticks: state.ticks });
        }

        let snapshot = self.builder.build(&self.candles[..state.next])?;
        state.next += 1;
        state.ticks += 1;
        Ok(snapshot)
    }

    async fn enter_long(&self, price: f64) -> Result<TargetPrices, ExchangeError> {
        self.enter(PositionSide::Long, price).await
    }

    async fn enter_short(&self, price: f64) -> Result<TargetPrices, ExchangeError> {
        self.enter(PositionSide::Short, price).await
    }

    fn name(&self) -> &str {
        "Paper Replay"
    }
}
