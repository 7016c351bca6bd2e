//! Scripted exchange for unit tests.

use async_trait::async_trait;
use rembot_core::error::ExchangeError;
use rembot_core::traits::ExchangeAdapter;
use rembot_core::types::{MarketSnapshot, Position, PositionSide, PositionStatus, TargetPrices};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays a fixed list of fetch results; entries bracket one unit around the price.
pub(crate) struct ScriptedExchange {
    fetches: Mutex<VecDeque<Result<MarketSnapshot, ExchangeError>>>,
    entries: Mutex<Vec<(PositionSide, f64)>>,
    fail_entries: bool,
    status: Option<PositionStatus>,
    prepared: Mutex<usize>,
}

impl ScriptedExchange {
    pub(crate) fn new(fetches: Vec<Result<MarketSnapshot, ExchangeError>>) -> Self {
        Self {
            fetches: Mutex::new(fetches.into()),
            entries: Mutex::new(Vec::new()),
            fail_entries: false,
            status: None,
            prepared: Mutex::new(0),
        }
    }

    pub(crate) fn failing_entries(mut self) -> Self {
        self.fail_entries = true;
        self
    }

    /// Report `status` for every open position instead of comparing prices.
    pub(crate) fn closing_with(mut self, status: PositionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub(crate) fn entries(&self) -> Vec<(PositionSide, f64)> {
        self.entries.lock().unwrap().clone()
    }

    pub(crate) fn prepare_calls(&self) -> usize {
        *self.prepared.lock().unwrap()
    }

    fn enter(&self, side: PositionSide, price: f64) -> Result<TargetPrices, ExchangeError> {
        if self.fail_entries {
            return Err(ExchangeError::OrderRejected("scripted rejection".into()));
        }
        self.entries.lock().unwrap().push((side, price));
        Ok(match side {
            PositionSide::Long => TargetPrices::new(price + 1.0, price - 1.0),
            PositionSide::Short => TargetPrices::new(price - 1.0, price + 1.0),
        })
    }
}

#[async_trait]
impl ExchangeAdapter for ScriptedExchange {
    async fn prepare(&self) -> Result<(), ExchangeError> {
        *self.prepared.lock().unwrap() += 1;
        Ok(())
    }

    async fn fetch_indicators(&self) -> Result<MarketSnapshot, ExchangeError> {
        self.fetches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ExchangeError::DataExhausted { ticks: 0 }))
    }

    async fn enter_long(&self, price: f64) -> Result<TargetPrices, ExchangeError> {
        self.enter(PositionSide::Long, price)
    }

    async fn enter_short(&self, price: f64) -> Result<TargetPrices, ExchangeError> {
        self.enter(PositionSide::Short, price)
    }

    async fn position_status(
        &self,
        position: &Position,
        snapshot: &MarketSnapshot,
    ) -> Result<PositionStatus, ExchangeError> {
        Ok(self
            .status
            .unwrap_or_else(|| position.check_exit(snapshot.price)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
