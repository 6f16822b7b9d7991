//! Application error types.
//!
//! Every failure in the workspace maps onto one of these variants. The
//! connection and query boundaries turn `Connection` / `Query` into error
//! envelopes; `Configuration` and `Validation` reach the top-level caller.

use thiserror::Error;
use validator::ValidationErrors;

/// Result alias used across all crates.
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// No configuration source produced a usable connection string and database.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Required parameter missing or malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Malformed URI, unreachable host, auth failure or ping rejection.
    #[error("{0}")]
    Connection(String),

    /// Bad filter shape or execution failure.
    #[error("{0}")]
    Query(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Stable code for logs and the resolution trace.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Connection(_) => "CONNECTION_ERROR",
            AppError::Query(_) => "QUERY_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
        }
    }
}
