//! Core traits for the decision engine.

mod exchange;
mod indicator;

pub use exchange::ExchangeAdapter;
pub use indicator::{Indicator, MultiOutputIndicator};
