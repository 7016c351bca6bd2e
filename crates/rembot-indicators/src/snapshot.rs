//! Builds indicator snapshots from kline windows.

use rembot_core::error::IndicatorError;
use rembot_core::traits::{Indicator, MultiOutputIndicator};
use rembot_core::types::{Candle, MarketSnapshot};

use crate::{Ema, Macd, Rsi};

/// Number of recent bars copied into each snapshot.
pub const DEFAULT_RECENT_BARS: usize = 5;

/// Computes price, MACD(12, 26, 9), EMA(100) and RSI(6) over closing prices.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    ema: Ema,
    macd: Macd,
    rsi: Rsi,
    recent_bars: usize,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            ema: Ema::new(100),
            macd: Macd::new(),
            rsi: Rsi::new(6),
            recent_bars: DEFAULT_RECENT_BARS,
        }
    }

    /// Keep `n` recent bars in each snapshot.
    pub fn with_recent_bars(mut self, n: usize) -> Self {
        self.recent_bars = n;
        self
    }

    /// Minimum number of candles needed to produce a snapshot.
    pub fn warmup(&self) -> usize {
        Indicator::period(&self.ema)
            .max(MultiOutputIndicator::period(&self.macd))
            .max(Indicator::period(&self.rsi))
    }

    /// Build a snapshot from candles ordered oldest first; the last candle is "now".
    pub fn build(&self, candles: &[Candle]) -> Result<MarketSnapshot, IndicatorError> {
        let last = candles.last().ok_or(IndicatorError::InsufficientData {
            required: self.warmup(),
            available: 0,
        })?;

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let ema_100 = self.ema.latest(&closes)?;
        let macd = self.macd.latest(&closes)?;
        let rsi_6 = self.rsi.latest(&closes)?;

        let start = candles.len().saturating_sub(self.recent_bars);
        let bars = candles[start..].iter().map(Candle::to_ohlc);

        Ok(
            MarketSnapshot::new(last.date_label(), last.close, macd.macd, macd.signal, ema_100, rsi_6)
                .with_bars(bars),
        )
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(closes: impl IntoIterator<Item = f64>) -> Vec<Candle> {
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| {
                Candle::new(i as i64 * 900_000, close, close + 1.0, close - 1.0, close, 10.0)
            })
            .collect()
    }

    #[test]
    fn test_warmup_is_ema_100() {
        assert_eq!(SnapshotBuilder::new().warmup(), 100);
    }

    #[test]
    fn test_build_on_flat_market() {
        let builder = SnapshotBuilder::new();
        let snap = builder.build(&candles(vec![250.0; 120])).unwrap();

        assert_eq!(snap.price, 250.0);
        assert!((snap.ema_100 - 250.0).abs() < 1e-9);
        assert!(snap.macd_fast.abs() < 1e-9);
        assert!(snap.macd_signal.abs() < 1e-9);
        // no losses at all
        assert_eq!(snap.rsi_6, 100.0);
        assert_eq!(snap.bars.len(), DEFAULT_RECENT_BARS);
        assert_eq!(snap.date, "1970-01-02 05:45");
    }

    #[test]
    fn test_build_on_falling_market() {
        let builder = SnapshotBuilder::new().with_recent_bars(3);
        let snap = builder
            .build(&candles((0..150).map(|i| 500.0 - i as f64)))
            .unwrap();

        assert!(snap.is_below_ema());
        assert!(snap.macd_fast < 0.0);
        assert!(snap.rsi_6 < 1e-9);
        assert_eq!(snap.bars.len(), 3);
        assert_eq!(snap.last_bar().unwrap().close, snap.price);
    }

    #[test]
    fn test_build_needs_warmup() {
        let builder = SnapshotBuilder::new();
        assert!(builder.build(&[]).is_err());
        assert!(matches!(
            builder.build(&candles(vec![1.0; 99])),
            Err(IndicatorError::InsufficientData { required: 100, available: 99 })
        ));
    }
}
