//! Technical indicators feeding the decision engine.
//!
//! - Moving averages (EMA)
//! - Momentum indicators (RSI, MACD)
//! - [`SnapshotBuilder`], which turns a kline window into a
//!   [`MarketSnapshot`](rembot_core::MarketSnapshot)

pub mod momentum;
pub mod moving_average;
pub mod snapshot;

pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::Ema;
pub use snapshot::SnapshotBuilder;
