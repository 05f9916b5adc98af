//! Error types for Tether
//!
//! Centralized error handling using thiserror. Only construction-time and
//! setup-time failures surface as errors; per-message transport failures are
//! converted to in-band sentinel text at the client boundary (see
//! `agent::client`).

use thiserror::Error;

/// All error types that can occur in Tether
#[derive(Debug, Error)]
pub enum TetherError {
    /// Missing or invalid endpoint configuration; fatal at construction
    #[error("Config error: {0}")]
    Config(String),

    /// Health probe failure; fatal, propagated to the caller of setup
    #[error("Connection error: {0}")]
    Connection(String),

    /// Tool registration/invocation error
    #[error("Tool error: {0}")]
    Tool(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Tether operations
pub type Result<T> = std::result::Result<T, TetherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = TetherError::Config("base URL is required".to_string());
        assert_eq!(err.to_string(), "Config error: base URL is required");
    }

    #[test]
    fn test_connection_error() {
        let err = TetherError::Connection("health probe returned 503".to_string());
        assert_eq!(err.to_string(), "Connection error: health probe returned 503");
    }

    #[test]
    fn test_tool_error() {
        let err = TetherError::Tool("handler failed".to_string());
        assert_eq!(err.to_string(), "Tool error: handler failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TetherError = io_err.into();
        assert!(matches!(err, TetherError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: TetherError = json_err.into();
        assert!(matches!(err, TetherError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(TetherError::Config("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
