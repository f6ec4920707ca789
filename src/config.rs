//! Configuration management for Stocklens.
//!
//! Handles loading configuration from TOML files, with CLI and environment
//! overrides applied by the caller.

use crate::error::{Result, StocklensError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Stocklens.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Generation service configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Inventory store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Generation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "gemini" or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name (e.g., "gemini-2.5-flash").
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds, applied to both generation calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Inventory store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("inventory.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stocklens")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| StocklensError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            StocklensError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
[llm]
provider = "gemini"
model = "gemini-2.5-flash"
timeout_secs = 20

[store]
path = "/var/lib/stocklens/inventory.db"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.timeout_secs, 20);
        assert_eq!(
            config.store.path,
            PathBuf::from("/var/lib/stocklens/inventory.db")
        );
    }

    #[test]
    fn test_missing_optional_fields() {
        let toml = r#"
[llm]
provider = "mock"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.llm.provider, "mock");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.store.path, PathBuf::from("inventory.db"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.store.path, PathBuf::from("inventory.db"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load_from_file(Path::new("/nonexistent/stocklens.toml")).unwrap();
        assert_eq!(config.llm.provider, "gemini");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = Config::parse_toml("[llm\nprovider=", Path::new("bad.toml"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .starts_with("Configuration error"));
    }
}
