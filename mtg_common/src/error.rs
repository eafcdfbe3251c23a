//! Error types for Scryfall requests

use crate::scryfall::ApiErrorBody;
use thiserror::Error;

/// A failed request against Scryfall (search API or a card detail page)
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-success HTTP status
    #[error("Scryfall API error: {status} {details}")]
    HttpStatus {
        status: reqwest::StatusCode,
        details: String,
    },
    /// Response body was not the JSON we expected
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Build an `HttpStatus` error, pulling `details` out of a Scryfall error
    /// body when there is one.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let details = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) => err.details,
            Err(_) => {
                log::debug!("Non-JSON error body for status {}", status);
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            }
        };
        FetchError::HttpStatus { status, details }
    }
}
