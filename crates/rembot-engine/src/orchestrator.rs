//! The polling loop that drives the state machine.

use rembot_config::BotSettings;
use rembot_core::error::BotResult;
use rembot_core::traits::ExchangeAdapter;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::bookkeeper::PositionBookkeeper;
use crate::performance::PerformanceTracker;
use crate::state::{step, PositionState, TickContext};

/// Single-symbol trading bot.
pub struct RemBot {
    exchange: Arc<dyn ExchangeAdapter>,
    book: PositionBookkeeper,
    tracker: PerformanceTracker,
    state: PositionState,
    sleep: Duration,
    ticks: u64,
}

impl RemBot {
    /// Prepare the exchange and block the side that goes against the trend.
    ///
    /// Any failure here is fatal: the loop never starts without an initial
    /// snapshot.
    pub async fn start(
        settings: &BotSettings,
        exchange: Arc<dyn ExchangeAdapter>,
        tracker: PerformanceTracker,
    ) -> BotResult<Self> {
        let mut bot = Self {
            exchange,
            book: PositionBookkeeper::new(),
            tracker,
            state: PositionState::Flat,
            sleep: settings.sleep_duration(),
            ticks: 0,
        };

        info!("RemBot is running...");
        info!(
            "Trading {} on {} every {:?}",
            settings.position.symbol,
            bot.exchange.name(),
            bot.sleep
        );
        let interval = Duration::from_secs(settings.runtime.interval.as_secs());
        if bot.sleep > interval {
            warn!(
                "Sleep {:?} is longer than the {} interval; candles will be skipped",
                bot.sleep, settings.runtime.interval
            );
        }
        bot.exchange.prepare().await?;
        bot.initial_block().await?;
        Ok(bot)
    }

    /// Block longs below the EMA and shorts at or above it.
    async fn initial_block(&mut self) -> BotResult<()> {
        let snapshot = self.exchange.fetch_indicators().await?;
        let (price, ema_100) = (snapshot.price, snapshot.ema_100);
        let below_ema = snapshot.is_below_ema();
        self.book.refresh(snapshot);

        if below_ema {
            self.book.block_long();
            info!("Price {:.2} below EMA_100 {:.2}: long entries blocked", price, ema_100);
        } else {
            self.book.block_short();
            info!("Price {:.2} at or above EMA_100 {:.2}: short entries blocked", price, ema_100);
        }
        Ok(())
    }

    /// Run one step of the state machine without sleeping.
    pub async fn tick(&mut self) {
        let mut ctx = TickContext {
            book: &mut self.book,
            exchange: self.exchange.as_ref(),
            tracker: &mut self.tracker,
        };
        self.state = step(self.state.clone(), &mut ctx).await;
        self.ticks += 1;
    }

    /// Sleep, tick, repeat until `shutdown` resolves.
    ///
    /// Shutdown is only observed while sleeping, so a tick always runs to completion.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested after {} ticks", self.ticks);
                    break;
                }
                _ = tokio::time::sleep(self.sleep) => {}
            }
            self.tick().await;
        }
    }

    pub fn state(&self) -> &PositionState {
        &self.state
    }

    pub fn bookkeeper(&self) -> &PositionBookkeeper {
        &self.book
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    /// Ticks run since start.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
