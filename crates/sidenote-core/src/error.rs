//! Error types for sidenote.

use thiserror::Error;

use crate::models::NoteId;

/// Result type alias using sidenote's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sidenote operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Note not found in its bucket
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    /// Storage backend operation failed (quota exceeded, backend unavailable)
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
