//! Error types for Waypoint
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Waypoint operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, credential acquisition, provider interactions,
/// and response streaming.
#[derive(Error, Debug)]
pub enum WaypointError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Authentication errors (e.g., 401 Unauthorized, 403 Forbidden)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Missing API credential
    #[error("Missing API credential: {0}")]
    MissingCredentials(String),

    /// Streaming errors (connection dropped mid-stream, malformed events)
    #[error("Stream error: {0}")]
    Stream(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Waypoint operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = WaypointError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = WaypointError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_authentication_error_display() {
        let error = WaypointError::Authentication("token expired".to_string());
        assert_eq!(error.to_string(), "Authentication error: token expired");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = WaypointError::MissingCredentials("OPENAI_API_KEY not set".to_string());
        assert_eq!(
            error.to_string(),
            "Missing API credential: OPENAI_API_KEY not set"
        );
    }

    #[test]
    fn test_stream_error_display() {
        let error = WaypointError::Stream("connection reset".to_string());
        assert_eq!(error.to_string(), "Stream error: connection reset");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: WaypointError = io_error.into();
        assert!(matches!(error, WaypointError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: WaypointError = json_error.into();
        assert!(matches!(error, WaypointError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: WaypointError = yaml_error.into();
        assert!(matches!(error, WaypointError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WaypointError>();
    }
}
