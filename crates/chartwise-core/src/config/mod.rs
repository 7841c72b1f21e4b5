//! Configuration management for Chartwise.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a missing file or a
//! partial file both work.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Chartwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input limits
    pub limits: LimitsConfig,

    /// Chart analysis provider
    pub gemini: GeminiConfig,

    /// News search provider
    pub perplexity: PerplexityConfig,

    /// Ticker validation
    pub ticker: TickerConfig,

    /// Credential storage
    pub keys: KeysConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Directory holding config.toml and credentials.toml.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.chartwise.chartwise/
    /// - Linux: ~/.config/chartwise/
    /// - Windows: C:\Users\<User>\AppData\Roaming\chartwise\config\
    ///
    /// Falls back to ~/.chartwise/ if directory detection fails.
    pub fn config_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "chartwise", "chartwise")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".chartwise")
            })
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Get the resolved credentials file path (with ~ expansion).
    pub fn keys_path(&self) -> PathBuf {
        match &self.keys.path {
            Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
            None => Self::config_dir().join("credentials.toml"),
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.max_image_bytes, 4 * 1024 * 1024);
        assert_eq!(config.perplexity.timeout_ms, 30_000);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.ticker.min_length, 2);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[gemini]"));
        assert!(toml.contains("[perplexity]"));
        assert!(toml.contains("search_recency_filter"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml("[perplexity]\ntimeout_ms = 5000\n").unwrap();
        assert_eq!(config.perplexity.timeout_ms, 5000);
        assert_eq!(config.perplexity.model, "sonar");
        assert_eq!(config.gemini.timeout_ms, 60_000);
    }

    #[test]
    fn test_invalid_file_rejected() {
        assert!(Config::from_toml("[ticker]\nmin_length = 0\n").is_err());
        assert!(Config::from_toml("not toml [").is_err());
    }

    #[test]
    fn test_load_from_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, Config::default().to_toml().unwrap()).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.perplexity.search_context_size, "medium");
    }

    #[test]
    fn test_keys_path_override_expands_tilde() {
        let mut config = Config::default();
        config.keys.path = Some("/tmp/chartwise/creds.toml".to_string());
        assert_eq!(config.keys_path(), PathBuf::from("/tmp/chartwise/creds.toml"));

        config.keys.path = None;
        assert!(config.keys_path().ends_with("credentials.toml"));
    }
}
