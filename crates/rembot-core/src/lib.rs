//! Core types and traits for the rembot decision engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Candle, Ohlc, MarketSnapshot)
//! - Position types (Position, TargetPrices, PositionStatus)
//! - The polling interval grammar
//! - Core traits for exchange adapters and indicators

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BotError, BotResult};
pub use traits::*;
pub use types::*;
