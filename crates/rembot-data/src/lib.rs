//! Data sources and sinks around the decision engine.

mod csv_source;
mod ledger;

pub use csv_source::CsvKlineSource;
pub use ledger::{ClosedTrade, LedgerError, ResultsLedger};

use rembot_core::error::DataError;
use rembot_core::types::Candle;

/// Load klines from a CSV file.
pub fn load_csv(path: &str) -> Result<Vec<Candle>, DataError> {
    CsvKlineSource::new(path)?.load_all()
}
