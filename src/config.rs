//! Configuration management for the Skycast client
//!
//! Provides defaults for the Open-Meteo endpoints and the search behavior,
//! with optional overrides loaded from a TOML file.

use crate::SkycastError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration structure for the Skycast client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// Network endpoints and timeouts
    #[serde(default)]
    pub network: NetworkConfig,
    /// Search and suggestion behavior
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Search and suggestion configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Debounce window for suggestion queries, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of suggestions requested per query
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: u32,
    /// Language hint for geocoding results
    #[serde(default = "default_language")]
    pub language: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_suggestion_count() -> u32 {
    10
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            suggestion_count: default_suggestion_count(),
            language: default_language(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SkycastConfig {
    /// Load configuration from an optional TOML file, falling back to defaults
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents).map_err(|e| {
                    SkycastError::config(format!("Failed to parse {}: {e}", path.display()))
                })?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::Result<()> {
        if self.network.timeout_seconds == 0 {
            return Err(SkycastError::config("timeout_seconds must be positive"));
        }
        if self.search.suggestion_count == 0 {
            return Err(SkycastError::config("suggestion_count must be positive"));
        }
        if self.network.forecast_base_url.is_empty() || self.network.geocoding_base_url.is_empty()
        {
            return Err(SkycastError::config("API base URLs must not be empty"));
        }
        Ok(())
    }

    /// Debounce window as a [`Duration`]
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// HTTP request timeout as a [`Duration`]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_seconds.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SkycastConfig::default();
        assert_eq!(config.network.forecast_base_url, "https://api.open-meteo.com/v1");
        assert_eq!(
            config.network.geocoding_base_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.suggestion_count, 10);
        assert_eq!(config.search.language, "en");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: SkycastConfig = toml::from_str(
            r#"
            [search]
            debounce_ms = 150
            "#,
        )
        .unwrap();

        assert_eq!(config.search.debounce_ms, 150);
        // Unset sections and fields keep their defaults
        assert_eq!(config.search.suggestion_count, 10);
        assert_eq!(config.network.timeout_seconds, 30);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = SkycastConfig::default();
        config.network.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_base_url() {
        let mut config = SkycastConfig::default();
        config.network.geocoding_base_url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_path_uses_defaults() {
        let config = SkycastConfig::load(None).unwrap();
        assert_eq!(config.search.debounce_ms, 300);
    }
}
