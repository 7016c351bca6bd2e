//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directives for `level`, keeping HTTP client internals quiet.
pub fn default_directives(level: &str) -> String {
    format!("{level},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn")
}

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(level, json, "Logging initialised");
    }
}
