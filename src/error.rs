use thiserror::Error;

use crate::transport::TransportError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Remote service answered with a non-success status
    #[error("Search service returned status {status}: {body}")]
    Http { status: u16, body: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::Http { .. } => "HTTP_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(msg) => AppError::Timeout(msg),
            TransportError::Connect(msg) | TransportError::Request(msg) => AppError::Network(msg),
            TransportError::Status { status, body } => AppError::Http { status, body },
            TransportError::Decode(msg) => AppError::Serialization(msg),
            TransportError::Client(msg) => AppError::Configuration(msg),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
