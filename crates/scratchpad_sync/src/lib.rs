//! # Scratchpad Sync
//!
//! Debounced auto-save for a scratchpad editor session.
//!
//! This crate provides:
//! - The auto-save state machine ([`SessionMachine`])
//! - An async driver owning the timers ([`SyncController`])
//! - Transport abstraction over the fetch/replace pair
//! - HTTP transport over a pluggable client
//!
//! ## Model
//!
//! A session holds the editor text and the last text known to be on the
//! server. Edits restart a single debounce timer; when it fires and the
//! text differs, the whole document is sent. Saves are never retried and
//! never cancelled. Several sessions writing the same document resolve by
//! last-write-wins.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod http;
mod state;
mod transport;

pub use config::{SyncConfig, DEFAULT_DEBOUNCE_DELAY, DEFAULT_STATUS_DISPLAY_DELAY};
pub use controller::{EditorCommand, SyncController, SyncHandle};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpReply, HttpTransport, LoopbackClient, LoopbackServer};
pub use state::{
    Effect, SaveTrigger, SessionBuffer, SessionMachine, StatusMessage, SyncSnapshot, SyncState,
    SyncStats,
};
pub use transport::{MockTransport, StoreTransport, SyncTransport};
