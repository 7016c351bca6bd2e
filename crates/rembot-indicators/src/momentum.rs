//! Momentum indicators.

use rembot_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

use crate::moving_average::ema_series;

/// Relative Strength Index (RSI) with Wilder's smoothing.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. The engine runs it with period 6.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Seed with a plain average, then `avg = (prev * (n - 1) + value) / n`.
    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let n = period as f64;
        let mut avg = values[..period].iter().sum::<f64>() / n;
        let mut out = Vec::with_capacity(values.len() - period + 1);
        out.push(avg);

        for &value in &values[period..] {
            avg = (avg * (n - 1.0) + value) / n;
            out.push(avg);
        }
        out
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let avg_gains = Self::wilder_smooth(&gains, self.period);
        let avg_losses = Self::wilder_smooth(&losses, self.period);

        avg_gains
            .iter()
            .zip(&avg_losses)
            .map(|(&gain, &loss)| {
                if loss == 0.0 {
                    100.0
                } else {
                    100.0 - 100.0 / (1.0 + gain / loss)
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // period price changes
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of the MACD line)
    pub signal: f64,
    /// MACD - signal
    pub histogram: f64,
}

/// MACD indicator.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        // Both EMA series end at the last price; drop the fast series' extra head.
        let fast = ema_series(data, self.fast_period);
        let slow = ema_series(data, self.slow_period);
        let fast = &fast[self.slow_period - self.fast_period..];

        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_series(&line, self.signal_period);

        line[self.signal_period - 1..]
            .iter()
            .zip(&signal)
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_all_gains_is_100() {
        let rsi = Rsi::new(6);
        let data: Vec<f64> = (1..=20).map(f64::from).collect();
        assert!((rsi.latest(&data).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        let rsi = Rsi::new(6);
        let data: Vec<f64> = (1..=20).rev().map(f64::from).collect();
        assert!(rsi.latest(&data).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_balanced_moves() {
        let rsi = Rsi::new(2);
        // changes: +1, -1 -> avg gain = avg loss -> 50
        let result = rsi.calculate(&[10.0, 11.0, 10.0]);
        assert_eq!(result.len(), 1);
        assert!((result[0] - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let rsi = Rsi::new(6);
        assert!(rsi.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).is_empty());
        assert!(rsi.latest(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let macd = Macd::new();
        let data = vec![100.0; 60];
        let out = macd.latest(&data).unwrap();
        assert!(out.macd.abs() < 1e-10);
        assert!(out.signal.abs() < 1e-10);
        assert!(out.histogram.abs() < 1e-10);
    }

    #[test]
    fn test_macd_rising_series_is_positive() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), data.len() - macd.period() + 1);
        let last = result.last().unwrap();
        assert!(last.macd > 0.0);
        assert!((last.histogram - (last.macd - last.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_insufficient_data() {
        let macd = Macd::new();
        let data = vec![1.0; 33];
        assert!(macd.calculate(&data).is_empty());
        assert!(macd.latest(&data).is_err());
    }
}
