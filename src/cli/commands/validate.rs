//! Validate configuration command.

use anyhow::Result;
use std::path::Path;

use super::load_settings;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_settings(config_path) {
        Ok(settings) => {
            println!("Configuration is valid!");
            println!();
            println!("{}", settings.redacted().to_toml()?);
        }
        Err(e) => {
            println!("Configuration error: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
