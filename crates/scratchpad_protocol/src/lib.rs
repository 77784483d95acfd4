//! # Scratchpad Protocol
//!
//! Wire contract between editors and the scratchpad server.
//!
//! This crate provides:
//! - [`Endpoint`] for the three routes (`/`, `/get`, `/save`)
//! - [`SaveReply`] for the status/body pair returned by `/save`
//! - Decoding helpers that turn raw HTTP replies into typed results
//!
//! Bodies are plain text: `/get` returns the document verbatim and `/save`
//! takes the full replacement document verbatim. There is no envelope.
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    decode_fetch_reply, decode_request_body, Endpoint, Method, SaveReply, HTML_CONTENT_TYPE,
    SAVE_ERROR_BODY, SAVE_OK_BODY, TEXT_CONTENT_TYPE,
};
