//! Error types for the CRM follow-up server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when talking to the CRM site or running a request.
#[derive(Error, Debug)]
pub enum CrmError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Document not found
    #[error("{0}")]
    NotFound(String),

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// The session user may not perform the action
    #[error("{0}")]
    PermissionDenied(String),

    /// Invalid request
    #[error("{0}")]
    InvalidRequest(String),

    /// A date string could not be parsed
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDateInput(String),

    /// The holiday calendar could not be loaded
    #[error("Holiday calendar lookup failed: {0}")]
    HolidayLookupFailure(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with CrmError
pub type CrmResult<T> = Result<T, CrmError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<crate::domain::ValidationError> for CrmError {
    fn from(err: crate::domain::ValidationError) -> Self {
        CrmError::InvalidRequest(err.to_string())
    }
}
