//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Reminder cadence, snooze length and working hours
//! - Water tracking goal and unit
//! - Suggestion preferences (outdoor activities, default time budget)
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Reminder scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: u32,
    #[serde(default = "default_true")]
    pub respect_working_hours: bool,
    #[serde(default = "default_work_start_hour")]
    pub work_start_hour: u32,
    #[serde(default = "default_work_end_hour")]
    pub work_end_hour: u32,
}

/// Unit the water goal and intake are counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterUnit {
    #[default]
    Glasses,
    Ounces,
    Milliliters,
}

impl WaterUnit {
    pub fn name(&self) -> &'static str {
        match self {
            WaterUnit::Glasses => "glasses",
            WaterUnit::Ounces => "oz",
            WaterUnit::Milliliters => "ml",
        }
    }

    /// Amount logged by a bare `water log`.
    pub fn default_serving(&self) -> u32 {
        match self {
            WaterUnit::Glasses => 1,
            WaterUnit::Ounces => 8,
            WaterUnit::Milliliters => 250,
        }
    }
}

impl fmt::Display for WaterUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Water tracking configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    #[serde(default)]
    pub unit: WaterUnit,
}

/// Suggestion preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Offer outdoor activities when weather is known.
    #[serde(default = "default_true")]
    pub outdoor_enabled: bool,
    /// Time budget used when no calendar information is given.
    #[serde(default)]
    pub default_available_seconds: Option<u64>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub water: WaterConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

fn default_true() -> bool {
    true
}
fn default_interval_minutes() -> u32 {
    45
}
fn default_snooze_minutes() -> u32 {
    10
}
fn default_work_start_hour() -> u32 {
    9
}
fn default_work_end_hour() -> u32 {
    17
}
fn default_daily_goal() -> u32 {
    8
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: default_interval_minutes(),
            snooze_minutes: default_snooze_minutes(),
            respect_working_hours: true,
            work_start_hour: default_work_start_hour(),
            work_end_hour: default_work_end_hour(),
        }
    }
}

impl ReminderConfig {
    /// Working hours as `(start, end)` when they apply and are well formed.
    pub fn working_hours(&self) -> Option<(u32, u32)> {
        (self.respect_working_hours && self.work_start_hour < self.work_end_hour && self.work_end_hour <= 24)
            .then_some((self.work_start_hour, self.work_end_hour))
    }
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_goal: default_daily_goal(),
            unit: WaterUnit::default(),
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            outdoor_enabled: true,
            default_available_seconds: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminders: ReminderConfig::default(),
            water: WaterConfig::default(),
            suggestions: SuggestionConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                // Clearing is only valid for optional fields; `Config::set`
                // rejects a null anywhere else when it deserializes.
                let clears = matches!(value, "none" | "null");
                let new_value = match existing {
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot set a whole section".to_string()));
                    }
                    _ if clears => serde_json::Value::Null,
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    // Optional numbers are stored as null until set.
                    serde_json::Value::Null => match value {
                        "" => serde_json::Value::Null,
                        _ => serde_json::Value::Number(
                            value
                                .parse::<u64>()
                                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                                .into(),
                        ),
                    },
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config file location.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location or return (and persist) defaults.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path` or return (and persist) defaults when it is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not parse
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
