use super::*;

/// Banner shown above the advanced section of the form
pub const ADVANCED_WARNING: &str = "Warning: Advanced settings affect core device functionality. \
Incorrect values may cause the device to malfunction.";

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/hammerqr.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_config_keys: false,
            advanced_warning: ADVANCED_WARNING.to_string(),
            time_sync_update_interval_ms: 1000,
            persist_state: false,
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            max_config_values: 16,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            file: "hammerqr_cache.json".to_string(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8090,
            static_dir: "./webui".to_string(),
        }
    }
}
