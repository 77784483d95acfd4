//! # Scratchpad Server
//!
//! HTTP server sharing one plain-text document across a local network.
//!
//! This crate provides:
//! - The editor page (`GET /`)
//! - Whole-document fetch (`GET /get`) and replace (`POST /save`)
//! - File-backed storage through `scratchpad_store`
//!
//! # Behavior
//!
//! A fetch never fails: an unreadable document is served as empty text.
//! A save replaces the whole document and answers `OK` (200) or
//! `Error` (500). There is no authentication, no history and no merge;
//! concurrent writers resolve by last-write-wins.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod server;

pub use config::{ServerConfig, DEFAULT_DATA_FILE, DEFAULT_MAX_DOCUMENT_BYTES, DEFAULT_PORT};
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, HandlerStats, RequestHandler};
pub use server::{ScratchpadServer, EDITOR_PAGE};
