//! Configuration structures.

use rembot_core::types::Interval;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Settings load or validation failure. Always fatal at startup.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SettingsError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Main bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub position: PositionSettings,
    #[serde(default)]
    pub runtime: RuntimeSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Exchange API credentials.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApiSettings {
    pub public_key: String,
    pub secret_key: String,
}

/// What to trade and how to size and bracket it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSettings {
    pub symbol: String,
    /// Decimal places for order quantities
    pub coin_precision: u32,
    /// Decimal places for take-profit and stop-loss prices
    pub price_precision: u32,
    pub tp_ratio: f64,
    pub sl_ratio: f64,
    pub leverage: u32,
    /// Quote-asset margin committed per entry
    pub order_margin: f64,
}

impl Default for PositionSettings {
    fn default() -> Self {
        Self {
            symbol: "ETHUSDT".to_string(),
            coin_precision: 2,
            price_precision: 2,
            tp_ratio: 0.005,
            sl_ratio: 0.005,
            leverage: 1,
            order_margin: 10.0,
        }
    }
}

/// Loop timing and order placement mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// When set, orders are never sent to the exchange
    pub test_mode: bool,
    pub interval: Interval,
    /// Seconds slept between ticks
    pub sleep_duration: f64,
    pub request_timeout_secs: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            test_mode: true,
            interval: Interval::default(),
            sleep_duration: 20.0,
            request_timeout_secs: 10,
        }
    }
}

/// Where closed positions are recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub csv_path: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            csv_path: "./results.csv".to_string(),
        }
    }
}

impl BotSettings {
    /// Check every field; the first violation is returned.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let position = &self.position;
        let runtime = &self.runtime;

        if position.symbol.trim().is_empty() {
            return Err(SettingsError::invalid("position.symbol", "cannot be empty"));
        }
        if position.leverage < 1 {
            return Err(SettingsError::invalid("position.leverage", "must be at least 1"));
        }
        if !(position.tp_ratio > 0.0) {
            return Err(SettingsError::invalid("position.tp_ratio", "must be greater than 0"));
        }
        if !(position.sl_ratio > 0.0) {
            return Err(SettingsError::invalid("position.sl_ratio", "must be greater than 0"));
        }
        if !(position.order_margin > 0.0) {
            return Err(SettingsError::invalid("position.order_margin", "must be greater than 0"));
        }
        if !(runtime.sleep_duration > 0.0)
            || Duration::try_from_secs_f64(runtime.sleep_duration).is_err()
        {
            return Err(SettingsError::invalid(
                "runtime.sleep_duration",
                "must be a positive, representable number of seconds",
            ));
        }
        if runtime.request_timeout_secs == 0 {
            return Err(SettingsError::invalid(
                "runtime.request_timeout_secs",
                "must be greater than 0",
            ));
        }
        if !runtime.test_mode
            && (self.api.public_key.is_empty() || self.api.secret_key.is_empty())
        {
            return Err(SettingsError::invalid(
                "api",
                "keys must not be empty when test_mode is false",
            ));
        }
        if self.output.csv_path.trim().is_empty() {
            return Err(SettingsError::invalid("output.csv_path", "cannot be empty"));
        }
        Ok(())
    }

    /// Delay between ticks. Values too large for a `Duration` saturate.
    pub fn sleep_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.runtime.sleep_duration).unwrap_or(Duration::MAX)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.runtime.request_timeout_secs)
    }

    /// Copy with API secrets masked, for printing.
    pub fn redacted(&self) -> Self {
        let mask = |s: &str| if s.is_empty() { String::new() } else { "********".to_string() };
        let mut copy = self.clone();
        copy.api.public_key = mask(&self.api.public_key);
        copy.api.secret_key = mask(&self.api.secret_key);
        copy
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
