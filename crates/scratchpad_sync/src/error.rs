//! Error types for the sync controller.

use scratchpad_protocol::ProtocolError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while talking to the document server.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The request never produced a reply.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server replied but could not persist the document.
    #[error("save rejected by server: {0}")]
    SaveRejected(String),

    /// The reply did not match the wire contract.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The controller has shut down.
    #[error("sync controller closed")]
    Closed,
}

impl SyncError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns true if the failure happened before a reply arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(SyncError::transport("connection refused").is_transport());
        assert!(!SyncError::SaveRejected("Error".into()).is_transport());
        assert!(!SyncError::Closed.is_transport());
    }

    #[test]
    fn error_display() {
        let err = SyncError::Closed;
        assert_eq!(err.to_string(), "sync controller closed");

        let err = SyncError::from(ProtocolError::UnexpectedStatus {
            path: "/get",
            status: 404,
        });
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("/get"));
    }
}
