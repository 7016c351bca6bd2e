//! Error types for the decision engine.

use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Results ledger error: {0}")]
    Ledger(String),

    #[error("No indicator snapshot has been fetched yet")]
    MissingSnapshot,
}

/// Exchange adapter errors.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Market data exhausted after {ticks} ticks")]
    DataExhausted { ticks: usize },

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No data available at {0}")]
    NoDataAvailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },
}

/// Result type alias for engine operations.
pub type BotResult<T> = Result<T, BotError>;
