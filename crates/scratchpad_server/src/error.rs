//! Error types for the scratchpad server.

use scratchpad_store::StoreError;
use std::net::SocketAddr;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the scratchpad server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The document store could not be opened or used.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Save body larger than the configured limit.
    #[error("document too large: {size} bytes (limit {limit})")]
    PayloadTooLarge {
        /// Size of the rejected body.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServerError::PayloadTooLarge { .. })
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ServerError::Store(_) | ServerError::Internal(_) | ServerError::Io(_)
        )
    }
}
