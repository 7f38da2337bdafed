mod config;
pub mod database;
pub mod migrations;
pub mod streak;

pub use config::{Config, ReminderConfig, SuggestionConfig, WaterConfig, WaterUnit};
pub use database::{Database, WaterLog};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `TOUCHGRASS_DATA_DIR` overrides the location entirely. Otherwise this is
/// `~/.config/touchgrass[-dev]/`, with the `-dev` suffix when
/// `TOUCHGRASS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TOUCHGRASS_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOUCHGRASS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("touchgrass-dev")
            } else {
                base_dir.join("touchgrass")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
