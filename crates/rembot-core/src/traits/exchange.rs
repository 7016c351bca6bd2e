//! Exchange adapter trait definition.

use crate::error::ExchangeError;
use crate::types::{MarketSnapshot, Position, PositionStatus, TargetPrices};
use async_trait::async_trait;

/// Trait for exchange integrations.
///
/// An adapter supplies indicator snapshots for the configured symbol, opens
/// positions with their take-profit/stop-loss brackets, and reports whether
/// an open position has been closed.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// One-time setup before the first tick (leverage, margin mode).
    async fn prepare(&self) -> Result<(), ExchangeError> {
        Ok(())
    }

    /// Fetch a fresh indicator snapshot.
    async fn fetch_indicators(&self) -> Result<MarketSnapshot, ExchangeError>;

    /// Open a long position at `price`.
    ///
    /// # Returns
    /// The take-profit and stop-loss prices placed for the position
    async fn enter_long(&self, price: f64) -> Result<TargetPrices, ExchangeError>;

    /// Open a short position at `price`.
    ///
    /// # Returns
    /// The take-profit and stop-loss prices placed for the position
    async fn enter_short(&self, price: f64) -> Result<TargetPrices, ExchangeError>;

    /// Check whether `position` has been closed by its take-profit or stop-loss.
    ///
    /// The default compares the latest snapshot price against the stored
    /// targets. Adapters that hold real bracket orders should ask the exchange.
    async fn position_status(
        &self,
        position: &Position,
        snapshot: &MarketSnapshot,
    ) -> Result<PositionStatus, ExchangeError> {
        Ok(position.check_exit(snapshot.price))
    }

    /// Get the adapter name.
    fn name(&self) -> &str;
}
