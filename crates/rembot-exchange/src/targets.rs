//! Take-profit/stop-loss placement and order sizing.

use rembot_config::PositionSettings;
use rembot_core::error::ExchangeError;
use rembot_core::types::{PositionSide, TargetPrices};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Fixed-ratio brackets around the entry price.
#[derive(Debug, Clone)]
pub struct TargetCalculator {
    tp_ratio: Decimal,
    sl_ratio: Decimal,
    price_precision: u32,
    coin_precision: u32,
    order_margin: Decimal,
    leverage: Decimal,
}

impl TargetCalculator {
    pub fn from_settings(settings: &PositionSettings) -> Result<Self, ExchangeError> {
        Ok(Self {
            tp_ratio: to_decimal(settings.tp_ratio, "tp_ratio")?,
            sl_ratio: to_decimal(settings.sl_ratio, "sl_ratio")?,
            price_precision: settings.price_precision,
            coin_precision: settings.coin_precision,
            order_margin: to_decimal(settings.order_margin, "order_margin")?,
            leverage: Decimal::from(settings.leverage),
        })
    }

    /// Take-profit and stop-loss for an entry at `price`, rounded to the price precision.
    pub fn targets(&self, side: PositionSide, price: f64) -> Result<TargetPrices, ExchangeError> {
        let price = to_decimal(price, "price")?;
        let (tp, sl) = match side {
            PositionSide::Long => (
                price * (dec!(1) + self.tp_ratio),
                price * (dec!(1) - self.sl_ratio),
            ),
            PositionSide::Short => (
                price * (dec!(1) - self.tp_ratio),
                price * (dec!(1) + self.sl_ratio),
            ),
        };

        Ok(TargetPrices::new(
            self.round_price(tp)?,
            self.round_price(sl)?,
        ))
    }

    /// Contracts bought with `order_margin * leverage` at `price`, truncated to the coin precision.
    pub fn quantity(&self, price: f64) -> Result<Decimal, ExchangeError> {
        let price = to_decimal(price, "price")?;
        if price <= Decimal::ZERO {
            return Err(ExchangeError::OrderRejected(format!(
                "cannot size an order at price {}",
                price
            )));
        }

        let qty = (self.order_margin * self.leverage / price)
            .round_dp_with_strategy(self.coin_precision, RoundingStrategy::ToZero);
        if qty.is_zero() {
            return Err(ExchangeError::OrderRejected(format!(
                "order quantity rounds to zero at price {}",
                price
            )));
        }
        Ok(qty)
    }

    /// Format a price at the configured precision for order parameters.
    pub fn format_price(&self, price: f64) -> Result<String, ExchangeError> {
        let price = to_decimal(price, "price")?
            .round_dp_with_strategy(self.price_precision, RoundingStrategy::MidpointAwayFromZero);
        Ok(price.to_string())
    }

    fn round_price(&self, price: Decimal) -> Result<f64, ExchangeError> {
        price
            .round_dp_with_strategy(self.price_precision, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .ok_or_else(|| ExchangeError::Parse(format!("price {} out of range", price)))
    }
}

fn to_decimal(value: f64, what: &str) -> Result<Decimal, ExchangeError> {
    Decimal::from_f64(value)
        .ok_or_else(|| ExchangeError::Configuration(format!("{} is not a finite number: {}", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator(leverage: u32) -> TargetCalculator {
        TargetCalculator::from_settings(&PositionSettings {
            leverage,
            ..PositionSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_long_targets() {
        let targets = calculator(1).targets(PositionSide::Long, 100.0).unwrap();
        assert_eq!(targets, TargetPrices::new(100.5, 99.5));
    }

    #[test]
    fn test_short_targets() {
        let targets = calculator(1).targets(PositionSide::Short, 2000.0).unwrap();
        assert_eq!(targets, TargetPrices::new(1990.0, 2010.0));
    }

    #[test]
    fn test_targets_round_to_price_precision() {
        // 1234.567 * 1.005 = 1240.739835, 1234.567 * 0.995 = 1228.394165
        let targets = calculator(1).targets(PositionSide::Long, 1234.567).unwrap();
        assert_eq!(targets.take_profit, 1240.74);
        assert_eq!(targets.stop_loss, 1228.39);
    }

    #[test]
    fn test_quantity_truncates() {
        // 10 * 5 / 1234.56 = 0.0405...
        assert_eq!(calculator(5).quantity(1234.56).unwrap(), dec!(0.04));
        // 10 * 1 / 3 = 3.333...
        assert_eq!(calculator(1).quantity(3.0).unwrap(), dec!(3.33));
    }

    #[test]
    fn test_quantity_rejects_dust() {
        assert!(matches!(
            calculator(1).quantity(5_000.0),
            Err(ExchangeError::OrderRejected(_))
        ));
        assert!(calculator(1).quantity(0.0).is_err());
    }

    #[test]
    fn test_non_finite_price() {
        assert!(calculator(1).targets(PositionSide::Long, f64::NAN).is_err());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(calculator(1).format_price(100.456).unwrap(), "100.46");
    }
}
