//! Configuration loading
//!
//! Reads the TOML configuration once at startup. A missing file is not an
//! error: the daemon runs with defaults and leaves the filesystem untouched.

use ssdfan_core::{Result, SsdFanError, StaticConfig};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Load and validate the configuration at `path`.
pub async fn load_config(path: &Path) -> Result<StaticConfig> {
    debug!("Loading configuration from: {}", path.display());

    let config = match fs::read_to_string(path).await {
        Ok(contents) => {
            let config = StaticConfig::from_toml(&contents).map_err(|e| {
                SsdFanError::Config(format!(
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            info!("Configuration loaded from {}", path.display());
            config
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(
                "Configuration file not found: {}. Using defaults.",
                path.display()
            );
            StaticConfig::default()
        }
        Err(e) => {
            return Err(SsdFanError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            )));
        }
    };
    config.validate()?;

    match config.to_toml() {
        Ok(rendered) => debug!("Effective configuration:\n{}", rendered),
        Err(e) => debug!("Could not render configuration: {}", e),
    }

    Ok(config)
}
