//! Error types for the box_client crate.

use thiserror::Error;

/// Errors that can occur when interacting with the Box API.
#[derive(Error, Debug)]
pub enum BoxError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid value for parameter {0}")]
    InvalidParameter(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for BoxError.
pub type Result<T> = std::result::Result<T, BoxError>;
