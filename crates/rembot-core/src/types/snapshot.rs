//! Market snapshot: one sampled instant of price and indicators.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Ohlc;

/// A single sampled instant of price, indicators and recent bars.
///
/// Snapshots are treated as values. The engine never mutates one in place:
/// a fresh snapshot replaces the previous one every tick, and the snapshot
/// captured at entry is an explicit clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Timestamp label
    pub date: String,
    /// Latest market price
    pub price: f64,
    /// MACD line
    pub macd_fast: f64,
    /// MACD signal line
    pub macd_signal: f64,
    /// 100-period exponential moving average
    pub ema_100: f64,
    /// 6-period RSI, in [0, 100]
    pub rsi_6: f64,
    /// Recent bars, oldest first
    pub bars: Vec<Ohlc>,
}

impl MarketSnapshot {
    /// Create a snapshot with no bars.
    ///
    /// Numeric arguments accept anything losslessly convertible to `f64`.
    pub fn new(
        date: impl Into<String>,
        price: impl Into<f64>,
        macd_fast: impl Into<f64>,
        macd_signal: impl Into<f64>,
        ema_100: impl Into<f64>,
        rsi_6: impl Into<f64>,
    ) -> Self {
        Self {
            date: date.into(),
            price: price.into(),
            macd_fast: macd_fast.into(),
            macd_signal: macd_signal.into(),
            ema_100: ema_100.into(),
            rsi_6: rsi_6.into(),
            bars: Vec::new(),
        }
    }

    /// Attach recent bars. The bars are copied into a vector owned by this snapshot.
    pub fn with_bars<I, B>(mut self, bars: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Ohlc>,
    {
        self.bars = bars.into_iter().map(Into::into).collect();
        self
    }

    /// Price is strictly below the 100-period EMA.
    #[inline]
    pub fn is_below_ema(&self) -> bool {
        self.price < self.ema_100
    }

    /// Most recent bar, if any.
    pub fn last_bar(&self) -> Option<&Ohlc> {
        self.bars.last()
    }
}

impl fmt::Display for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PRICE: {:.2} | MACD_12: {:.2} | MACD_26: {:.2} | EMA_100: {:.2} | RSI_6: {:.2}",
            self.price, self.macd_fast, self.macd_signal, self.ema_100, self.rsi_6
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MarketSnapshot {
        MarketSnapshot::new("2025-08-29 00:00", 10.0, 0.1, 0.2, 100.0, 55.0)
            .with_bars([(1.0, 2.0, 0.5, 2.5), (3.0, 4.0, 2.5, 5.0)])
    }

    #[test]
    fn test_new_converts_integers() {
        let src_bars = vec![(10.0, 11.0, 9.0, 12.0), (20.5, 21.5, 19.0, 22.0)];
        let snap = MarketSnapshot::new("2025-08-29 00:00", 100, 1, -2, 200, 50)
            .with_bars(src_bars.clone());

        assert_eq!(snap.price, 100.0);
        assert_eq!(snap.macd_fast, 1.0);
        assert_eq!(snap.macd_signal, -2.0);
        assert_eq!(snap.ema_100, 200.0);
        assert_eq!(snap.rsi_6, 50.0);

        let expected: Vec<Ohlc> = src_bars.into_iter().map(Ohlc::from).collect();
        assert_eq!(snap.bars, expected);
    }

    #[test]
    fn test_display_two_decimals() {
        let snap = MarketSnapshot::new("2025-08-29 00:00", 123.456, 1.234, -4.567, 200.0, 49.5);
        assert_eq!(
            snap.to_string(),
            "PRICE: 123.46 | MACD_12: 1.23 | MACD_26: -4.57 | EMA_100: 200.00 | RSI_6: 49.50"
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = sample();
        let mut cloned = original.clone();

        assert_eq!(cloned, original);
        assert_ne!(cloned.bars.as_ptr(), original.bars.as_ptr());

        cloned.bars[0] = Ohlc::new(99.0, 99.0, 99.0, 99.0);
        cloned.bars.push(Ohlc::new(7.0, 8.0, 6.0, 9.0));
        assert_eq!(original.bars[0], Ohlc::new(1.0, 2.0, 0.5, 2.5));
        assert_eq!(original.bars.len(), 2);

        original.bars[1] = Ohlc::new(42.0, 43.0, 41.0, 44.0);
        assert_eq!(cloned.bars[1], Ohlc::new(3.0, 4.0, 2.5, 5.0));
    }

    #[test]
    fn test_default_bars_empty() {
        let a = MarketSnapshot::new("a", 1.0, 0.0, 0.0, 1.0, 50.0);
        let mut b = MarketSnapshot::new("b", 2.0, 0.0, 0.0, 2.0, 50.0);
        assert!(a.bars.is_empty());
        assert!(b.bars.is_empty());

        b.bars.push(Ohlc::default());
        assert!(a.bars.is_empty());
        assert!(a.last_bar().is_none());
    }

    #[test]
    fn test_is_below_ema() {
        assert!(MarketSnapshot::new("", 100.0, 0.0, 0.0, 150.0, 50.0).is_below_ema());
        assert!(!MarketSnapshot::new("", 150.0, 0.0, 0.0, 150.0, 50.0).is_below_ema());
        assert!(!MarketSnapshot::new("", 200.0, 0.0, 0.0, 150.0, 50.0).is_below_ema());
    }
}
