//! Kline and OHLC quadruple types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One exchange kline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time, Unix milliseconds
    pub open_time: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded base volume
    pub volume: f64,
}

impl Candle {
    /// Create a new candle.
    pub fn new(open_time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get the open time as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.open_time).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Date label used in snapshots and the results ledger.
    pub fn date_label(&self) -> String {
        self.datetime().format("%Y-%m-%d %H:%M").to_string()
    }

    /// Reduce to the (open, close, low, high) quadruple kept in snapshots.
    #[inline]
    pub fn to_ohlc(&self) -> Ohlc {
        Ohlc {
            open: self.open,
            close: self.close,
            low: self.low,
            high: self.high,
        }
    }
}

/// Recent bar as carried by a [`MarketSnapshot`](super::MarketSnapshot).
///
/// Field order follows the (open, close, low, high) quadruple convention of
/// the indicator feed, not the usual OHLC order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
}

impl Ohlc {
    pub fn new(open: f64, close: f64, low: f64, high: f64) -> Self {
        Self {
            open,
            close,
            low,
            high,
        }
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// High minus low.
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

impl From<(f64, f64, f64, f64)> for Ohlc {
    fn from((open, close, low, high): (f64, f64, f64, f64)) -> Self {
        Self::new(open, close, low, high)
    }
}
