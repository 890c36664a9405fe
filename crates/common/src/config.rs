//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Detector profile used when a command does not name one explicitly.
    #[serde(default)]
    pub profile: Option<PathBuf>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "emotrace_detection_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: impl AsRef<Path>) -> Self {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(config_file_path())
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, config_path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("emotrace").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("emotrace_test_missing_config.json");
        let _ = std::fs::remove_file(&path);

        let config = AppConfig::load_from(&path);
        assert!(config.profile.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join("emotrace_test_config_dir");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.json");

        let config = AppConfig {
            profile: Some(PathBuf::from("/srv/profiles/booth.json")),
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: true,
            },
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.profile, config.profile);
        assert_eq!(loaded.logging.level, "debug");
        assert!(loaded.logging.json);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("emotrace_test_bad_config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.logging.level, "info");

        std::fs::remove_file(&path).ok();
    }
}
