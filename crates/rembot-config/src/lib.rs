//! Configuration management.
//!
//! Settings come from a TOML file, overridden by `REMBOT__SECTION__KEY`
//! environment variables, and are validated before the engine starts.

mod settings;

pub use settings::{
    ApiSettings, BotSettings, OutputSettings, PositionSettings, RuntimeSettings, SettingsError,
};

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Load and validate settings from a file plus the environment.
pub fn load_config(path: &Path) -> Result<BotSettings, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .add_source(environment())
        .build()?;

    finish(config)
}

/// Load and validate settings from TOML text plus the environment.
pub fn load_config_str(toml: &str) -> Result<BotSettings, SettingsError> {
    let config = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .add_source(environment())
        .build()?;

    finish(config)
}

fn environment() -> Environment {
    Environment::with_prefix("REMBOT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn finish(config: Config) -> Result<BotSettings, SettingsError> {
    let settings: BotSettings = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
