//! Exchange adapters.
//!
//! [`BinanceFutures`] talks to the Binance USDⓈ-M futures REST API;
//! [`PaperExchange`] replays historical klines offline. Both size and bracket
//! entries with the same [`TargetCalculator`].

mod binance;
mod paper;
mod targets;

pub use binance::{sign, BinanceConfig, BinanceFutures, BINANCE_FUTURES_URL};
pub use paper::{PaperEntry, PaperExchange};
pub use targets::TargetCalculator;
