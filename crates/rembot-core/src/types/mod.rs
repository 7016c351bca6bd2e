//! Core data types for the decision engine.

mod candle;
mod interval;
mod position;
mod snapshot;

pub use candle::{Candle, Ohlc};
pub use interval::{Interval, IntervalUnit};
pub use position::{Position, PositionSide, PositionStatus, TargetPrices, TradeOutcome};
pub use snapshot::MarketSnapshot;
