//! Protocol error types.

use thiserror::Error;

/// Result type for protocol decoding.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised when a reply does not match the wire contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The server answered with a status the endpoint never produces.
    #[error("unexpected status {status} from {path}")]
    UnexpectedStatus {
        /// Endpoint path.
        path: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// The status was valid but the body was not.
    #[error("unexpected body from {path}: {body:?}")]
    UnexpectedBody {
        /// Endpoint path.
        path: &'static str,
        /// Body as received.
        body: String,
    },
}
