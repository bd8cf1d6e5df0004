//! vPIC-specific error types

use thiserror::Error;

use crate::models::ValidationError;

/// Failure of a VIN decode.
///
/// Everything past input validation is reported to the user with the same
/// generic message; the underlying cause is kept as the error source.
#[derive(Error, Debug)]
pub enum VinError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to decode VIN")]
    Http(#[source] reqwest::Error),

    #[error("Failed to decode VIN")]
    Status(u16),

    #[error("Failed to decode VIN")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to decode VIN")]
    NoResults,

    #[error("Invalid vPIC base URL: {0}")]
    Config(String),
}

impl VinError {
    /// Short description of the underlying cause, for logs
    pub fn cause(&self) -> String {
        match self {
            VinError::Invalid(e) => e.to_string(),
            VinError::Http(e) => e.to_string(),
            VinError::Status(code) => format!("unexpected status {}", code),
            VinError::Parse(e) => format!("unparseable response: {}", e),
            VinError::NoResults => "response contained no results".to_string(),
            VinError::Config(msg) => msg.clone(),
        }
    }
}
