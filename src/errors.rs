//! # Application Error Types
//!
//! This module defines the error types shared by the kitchen core: inventory
//! patches, storage mutations, session handling and recipe generation.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Validation errors (food names, inputs, etc.)
    Validation(String),
    /// No established session, or the backend rejected our credentials
    AuthRequired,
    /// Transport-level failures (connection refused, DNS, broken body)
    Network(String),
    /// A network call exceeded its configured timeout
    Timeout,
    /// The backend answered with a non-success HTTP status
    NonSuccessStatus(u16),
    /// The backend answered with a body we could not interpret at all
    MalformedResponse(String),
    /// A positional edit or delete referenced a slot that does not exist
    IndexOutOfRange { index: usize, len: usize },
    /// Internal application errors
    Internal(String),
}

impl AppError {
    /// Map an HTTP status code to the matching error variant.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => AppError::AuthRequired,
            other => AppError::NonSuccessStatus(other),
        }
    }

    /// Whether the caller should redirect to the sign-in flow.
    pub fn requires_auth(&self) -> bool {
        matches!(self, AppError::AuthRequired)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::AuthRequired => write!(f, "[AUTH] sign-in required"),
            AppError::Network(msg) => write!(f, "[NETWORK] {}", msg),
            AppError::Timeout => write!(f, "[NETWORK] request timed out"),
            AppError::NonSuccessStatus(status) => write!(f, "[HTTP] backend returned status {}", status),
            AppError::MalformedResponse(msg) => write!(f, "[RESPONSE] {}", msg),
            AppError::IndexOutOfRange { index, len } => {
                write!(f, "[INVENTORY] index {} out of range for {} items", index, len)
            }
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout
        } else if err.is_decode() {
            AppError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::from_status(status.as_u16())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::{error, warn};

    use crate::inventory::StorageLocation;

    /// Log network/communication errors with endpoint context
    pub fn log_network_error(
        error: &impl std::fmt::Display,
        operation: &str,
        endpoint: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            endpoint = ?endpoint,
            "Network operation failed"
        );
    }

    /// Log a storage mutation the backend refused; local inventory stays untouched
    pub fn log_storage_error(
        error: &impl std::fmt::Display,
        operation: &str,
        location: StorageLocation,
        index: Option<usize>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            location = %location,
            index = ?index,
            "Storage mutation failed"
        );
    }

    /// Log a failed recipe generation with request context
    pub fn log_recipe_error(
        error: &impl std::fmt::Display,
        generation: u64,
        main_ingredient: Option<&str>,
        pantry_size: usize,
    ) {
        warn!(
            error = %error,
            generation = %generation,
            main_ingredient = ?main_ingredient,
            pantry_size = %pantry_size,
            "Failed to generate recipe"
        );
    }

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            input_type = %input_type,
            input_value = ?input_value.map(|v| if v.chars().count() > 100 {
                format!("{}...", v.chars().take(100).collect::<String>())
            } else {
                v.to_string()
            }),
            "Validation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
