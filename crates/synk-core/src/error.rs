//! Error types for synk-core

use thiserror::Error;

/// Result type alias using synk-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in synk-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error from the local store
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Candidate document failed top-level shape validation
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entry not found
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Remote store rejected or failed a request
    #[error("Remote error: {0}")]
    Remote(String),

    /// HTTP transport error talking to the remote store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
