//! Database error types

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The service rejected the request; `message` is shown to the user as-is
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse database response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Database not configured: {0}")]
    NotConfigured(String),
}

/// PostgREST error body
#[derive(Debug, Deserialize)]
pub struct PostgrestErrorResponse {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl DatabaseError {
    /// Build an API error from a non-success response body
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<PostgrestErrorResponse>(body) {
            Ok(error_response) => error_response.message,
            Err(_) if !body.trim().is_empty() => body.to_string(),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };

        DatabaseError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
