use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    ValidationError(String),
    ParseError(String),
    LLMError(String),
    /// Startup configuration is missing or malformed. Sticky until restart.
    ConfigError(String),
    /// The spreadsheet service could not be reached or a named resource is missing.
    ConnectionError(String),
    Unauthorized(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::LLMError(msg) => write!(f, "LLM error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ConnectionError(msg) => write!(f, "Spreadsheet error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "{}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ConnectionError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_displays_bare_message() {
        let err = AppError::Unauthorized("Invalid credentials.".to_string());
        assert_eq!(err.to_string(), "Invalid credentials.");
    }

    #[test]
    fn test_config_error_keeps_reason() {
        let err = AppError::ConfigError("GCP_CREDENTIALS_JSON is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: GCP_CREDENTIALS_JSON is not set"
        );
    }

    #[test]
    fn test_json_error_maps_to_parse_error() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::ParseError(_)));
    }
}
