//! CLI command implementations.

pub mod replay;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use rembot_config::{load_config, load_config_str, BotSettings};
use std::path::Path;
use tracing::warn;

/// Load settings from `path`, or from defaults and the environment if the file is missing.
pub fn load_settings(path: &Path) -> Result<BotSettings> {
    if path.exists() {
        load_config(path).with_context(|| format!("Failed to load {}", path.display()))
    } else {
        warn!("{} not found, using defaults and environment", path.display());
        load_config_str("").context("Invalid settings from environment")
    }
}
