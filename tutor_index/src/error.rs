//! Error types for tutor_index

use mtg_common::FetchError;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for tutor_index operations
#[derive(Debug, Error)]
pub enum Error {
    /// Scryfall request failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A required input file is absent or unreadable
    #[error("Cannot read {}: {source}", path.display())]
    MissingInput {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A required input file is not the JSON we expect
    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidInput {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// File I/O error while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Web server failed to bind or run
    #[error("Server error: {0}")]
    Server(String),
}

/// Result alias for tutor_index operations
pub type Result<T> = std::result::Result<T, Error>;
