//! Moving average indicators.

use rembot_core::traits::Indicator;

/// Exponential Moving Average (EMA).
///
/// Seeded with the simple average of the first `period` values, then
/// `ema = price * k + prev * (1 - k)` with `k = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        ema_series(data, self.period)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// EMA values from index `period - 1` onward; empty if `data` is too short.
pub(crate) fn ema_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = data[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(data.len() - period + 1);
    out.push(seed);
    let mut ema = seed;
    for &price in &data[period..] {
        ema = price * k + ema * (1.0 - k);
        out.push(ema);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema() {
        let ema = Ema::new(3);
        let result = ema.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-10); // seed
        // k = 0.5: 4 * 0.5 + 2 * 0.5
        assert!((result[1] - 3.0).abs() < 1e-10);
        assert!((result[2] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_insufficient_data() {
        let ema = Ema::new(5);
        assert!(ema.calculate(&[1.0, 2.0, 3.0]).is_empty());
        assert!(ema.latest(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_ema_of_constant_series() {
        let ema = Ema::new(100);
        let data = vec![42.0; 150];
        assert!((ema.latest(&data).unwrap() - 42.0).abs() < 1e-10);
    }
}
