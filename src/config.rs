//! Configuration management for Waypoint
//!
//! This module handles loading, parsing, and validating configuration
//! from a YAML file with environment variable overrides.

use crate::error::{Result, WaypointError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Waypoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the completions API
    ///
    /// Overridable so tests can point the provider at a mock server.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Connection timeout in seconds
    ///
    /// Applies to connection establishment only; streamed responses run
    /// on the transport default once connected.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file with env overrides
    ///
    /// Falls back to defaults when the file does not exist. Environment
    /// variables (`WAYPOINT_MODEL`, `WAYPOINT_API_BASE`,
    /// `WAYPOINT_CONNECT_TIMEOUT`) are applied on top of the file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WaypointError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| WaypointError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(model) = std::env::var("WAYPOINT_MODEL") {
            self.provider.model = model;
        }

        if let Ok(api_base) = std::env::var("WAYPOINT_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(timeout) = std::env::var("WAYPOINT_CONNECT_TIMEOUT") {
            if let Ok(value) = timeout.parse() {
                self.provider.connect_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid WAYPOINT_CONNECT_TIMEOUT: {}", timeout);
            }
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error for an empty model name, a malformed API base,
    /// or a zero connection timeout
    pub fn validate(&self) -> Result<()> {
        if self.provider.model.trim().is_empty() {
            return Err(WaypointError::Config("model must not be empty".to_string()).into());
        }

        if !self.provider.api_base.starts_with("http://")
            && !self.provider.api_base.starts_with("https://")
        {
            return Err(WaypointError::Config(format!(
                "api_base must be an http(s) URL, got: {}",
                self.provider.api_base
            ))
            .into());
        }

        if self.provider.connect_timeout_seconds == 0 {
            return Err(
                WaypointError::Config("connect_timeout_seconds must be positive".to_string())
                    .into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.api_base, "https://api.openai.com/v1");
        assert_eq!(config.provider.connect_timeout_seconds, 30);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/config.yaml").unwrap();
        assert_eq!(config.provider.model, "gpt-4o-mini");
    }

    #[test]
    #[serial]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "provider:\n  model: gpt-4o\n  api_base: http://localhost:9999/v1"
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.provider.api_base, "http://localhost:9999/v1");
        // Unspecified fields keep their defaults.
        assert_eq!(config.provider.connect_timeout_seconds, 30);
    }

    #[test]
    #[serial]
    fn test_load_rejects_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider: [not: a: mapping").unwrap();

        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        std::env::set_var("WAYPOINT_MODEL", "gpt-4.1-mini");
        std::env::set_var("WAYPOINT_API_BASE", "http://localhost:1234/v1");

        let config = Config::load("/nonexistent/config.yaml").unwrap();
        assert_eq!(config.provider.model, "gpt-4.1-mini");
        assert_eq!(config.provider.api_base, "http://localhost:1234/v1");

        std::env::remove_var("WAYPOINT_MODEL");
        std::env::remove_var("WAYPOINT_API_BASE");
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_env_var_is_ignored() {
        std::env::set_var("WAYPOINT_CONNECT_TIMEOUT", "not-a-number");
        let config = Config::load("/nonexistent/config.yaml").unwrap();
        assert_eq!(config.provider.connect_timeout_seconds, 30);
        std::env::remove_var("WAYPOINT_CONNECT_TIMEOUT");
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let config = Config {
            provider: ProviderConfig {
                model: "  ".to_string(),
                ..Default::default()
            },
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_api_base() {
        let config = Config {
            provider: ProviderConfig {
                api_base: "localhost:9999".to_string(),
                ..Default::default()
            },
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            provider: ProviderConfig {
                connect_timeout_seconds: 0,
                ..Default::default()
            },
        };
        assert!(config.validate().is_err());
    }
}
