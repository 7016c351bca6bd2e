//! Logging.

mod logging;

pub use logging::{default_directives, setup_logging};
