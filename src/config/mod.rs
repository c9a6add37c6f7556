//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/trip-log/config.toml

pub mod defaults;

use crate::constants::api::BIGDATACLOUD_REVERSE_URL;
use crate::constants::storage::{APP_DIR_NAME, TRIPS_FILE_NAME};
use crate::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Reverse geocoding service
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Where saved trips live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Input and output formatting
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Reverse geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Endpoint URL; receives `latitude` and `longitude` query parameters
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Trips file; empty means the XDG data directory
    #[serde(default)]
    pub path: String,
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// chrono format string for typed and printed visit dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

// Default value functions for serde
fn default_base_url() -> String {
    BIGDATACLOUD_REVERSE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoding", "base_url"] => Some(self.geocoding.base_url.clone()),
            ["geocoding", "timeout_secs"] => Some(self.geocoding.timeout_secs.to_string()),
            ["storage", "path"] => Some(self.storage.path.clone()),
            ["display", "date_format"] => Some(self.display.date_format.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoding", "base_url"] => {
                self.geocoding.base_url = value.to_string();
            }
            ["geocoding", "timeout_secs"] => {
                let secs: u64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
                check_timeout(secs)?;
                self.geocoding.timeout_secs = secs;
            }
            ["storage", "path"] => {
                self.storage.path = value.to_string();
            }
            ["display", "date_format"] => {
                check_date_format(value)?;
                self.display.date_format = value.to_string();
            }
            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// Check values a hand-edited file could get wrong
    pub fn validate(&self) -> Result<()> {
        check_timeout(self.geocoding.timeout_secs)?;
        check_date_format(&self.display.date_format)
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoding.base_url",
            "geocoding.timeout_secs",
            "storage.path",
            "display.date_format",
        ]
    }

    /// Resolve the trips file path
    ///
    /// Uses `storage.path` when set, else ~/.local/share/trip-log/trips.json
    pub fn trips_path(&self) -> Result<PathBuf> {
        if !self.storage.path.is_empty() {
            return Ok(PathBuf::from(&self.storage.path));
        }
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME).join(TRIPS_FILE_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }
}

fn check_timeout(secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(Error::Config("Timeout must be at least 1 second".to_string()));
    }
    Ok(())
}

// chrono panics when formatting with an invalid specifier
fn check_date_format(format: &str) -> Result<()> {
    let invalid = StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    if format.is_empty() || invalid {
        return Err(Error::Config(format!("Invalid date format: {}", format)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.geocoding.base_url, BIGDATACLOUD_REVERSE_URL);
        assert_eq!(config.geocoding.timeout_secs, 10);
        assert!(config.storage.path.is_empty());
        assert_eq!(config.display.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("geocoding.timeout_secs"), Some("10".to_string()));

        config.set("geocoding.timeout_secs", "3").unwrap();
        assert_eq!(config.geocoding.timeout_secs, 3);

        config.set("display.date_format", "%Y-%m-%d").unwrap();
        assert_eq!(config.get("display.date_format"), Some("%Y-%m-%d".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("geocoding.timeout_secs", "soon").is_err());
        assert!(config.set("geocoding.timeout_secs", "0").is_err());
        assert_eq!(config.geocoding.timeout_secs, 10);
        assert!(config.set("display.date_format", "%Q").is_err());
        assert!(config.set("display.date_format", "").is_err());
        assert_eq!(config.display.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_every_available_key_is_gettable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "{}", key);
        }
    }

    #[test]
    fn test_load_creates_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.geocoding.timeout_secs, 10);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.geocoding.base_url = "http://localhost:8080/reverse".to_string();
        config.storage.path = "/tmp/trips.json".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.geocoding.base_url, "http://localhost:8080/reverse");
        assert_eq!(loaded.storage.path, "/tmp/trips.json");
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        fs::write(&path, "[display]\ndate_format = \"%Q\"\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("%Q")));

        fs::write(&path, "[geocoding]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[geocoding]\ntimeout_secs = 2\n").unwrap();
        assert_eq!(loaded.geocoding.timeout_secs, 2);
        assert_eq!(loaded.geocoding.base_url, BIGDATACLOUD_REVERSE_URL);
        assert_eq!(loaded.display.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[geocoding]"));
        assert!(toml.contains("[storage]"));
        assert!(toml.contains("[display]"));
    }

    #[test]
    fn test_trips_path_override() {
        let mut config = Config::default();
        config.storage.path = "/data/trips.json".to_string();
        assert_eq!(config.trips_path().unwrap(), PathBuf::from("/data/trips.json"));
    }
}
