//! Error types and handling for the Skycast client

use thiserror::Error;

/// Main error type for the Skycast client
#[derive(Error, Debug)]
pub enum SkycastError {
    /// Geocoding request or parse errors
    #[error("Geocoding error: {message}")]
    Geocode { message: String },

    /// Forecast request or parse errors
    #[error("Forecast error: {message}")]
    Fetch { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkycastError {
    /// Create a new geocoding error
    pub fn geocode<S: Into<String>>(message: S) -> Self {
        Self::Geocode {
            message: message.into(),
        }
    }

    /// Create a new forecast fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Geocode { .. } | SkycastError::Fetch { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            SkycastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SkycastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkycastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let geo_err = SkycastError::geocode("request failed");
        assert!(matches!(geo_err, SkycastError::Geocode { .. }));

        let fetch_err = SkycastError::fetch("connection reset");
        assert!(matches!(fetch_err, SkycastError::Fetch { .. }));

        let validation_err = SkycastError::validation("query too short");
        assert!(matches!(validation_err, SkycastError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let fetch_err = SkycastError::fetch("test");
        assert!(fetch_err.user_message().contains("Unable to reach"));

        let validation_err = SkycastError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let config_err = SkycastError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let sky_err: SkycastError = io_err.into();
        assert!(matches!(sky_err, SkycastError::Io { .. }));
    }
}
