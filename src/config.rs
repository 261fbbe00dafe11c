//! Configuration management for hammerqr
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{HammerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "HAMMERQR_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Form behaviour and live refresh settings
    pub ui: UiConfig,

    /// QR payload limits
    pub qr: QrConfig,

    /// Local cache location
    pub persistence: PersistenceConfig,

    /// Web server binding configuration
    pub web: WebConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file; its parent directory receives the rolling files
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Form behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show device-facing keys next to field labels
    pub show_config_keys: bool,

    /// Banner shown above advanced fields
    pub advanced_warning: String,

    /// Refresh period of the time-sync timestamp while it is enabled
    pub time_sync_update_interval_ms: u64,

    /// Mirror the form state into the local cache on every change
    pub persist_state: bool,
}

/// QR payload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Maximum number of `key=value` pairs placed in one payload
    pub max_config_values: usize,
}

/// Local cache location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// JSON file backing the cache
    pub file: String,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Directory with the static front-end
    pub static_dir: String,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first location that exists
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }

        let default_paths = ["hammerqr.yaml", "/etc/hammerqr/config.yaml"];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Self::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.qr.max_config_values == 0 {
            return Err(HammerError::validation(
                "qr.max_config_values",
                "Must be greater than 0",
            ));
        }

        if self.ui.time_sync_update_interval_ms == 0 {
            return Err(HammerError::validation(
                "ui.time_sync_update_interval_ms",
                "Must be greater than 0",
            ));
        }

        if self.ui.persist_state && self.persistence.file.trim().is_empty() {
            return Err(HammerError::validation(
                "persistence.file",
                "Cache file path cannot be empty when persist_state is enabled",
            ));
        }

        if self.web.port == 0 {
            return Err(HammerError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.qr.max_config_values, 16);
        assert_eq!(config.ui.time_sync_update_interval_ms, 1000);
        assert!(!config.ui.persist_state);
        assert!(!config.ui.show_config_keys);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.qr.max_config_values = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.ui.persist_state = true;
        config.persistence.file = "  ".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.web.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("ui:\n  persist_state: true\n").unwrap();
        assert!(config.ui.persist_state);
        assert_eq!(config.ui.time_sync_update_interval_ms, 1000);
        assert_eq!(config.qr.max_config_values, 16);
    }
}
