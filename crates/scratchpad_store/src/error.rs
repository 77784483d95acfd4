//! Error types for store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The persisted document does not exist.
    #[error("document not found at {}", path.display())]
    NotFound {
        /// Location that was expected to hold the document.
        path: PathBuf,
    },

    /// The persisted bytes are not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
