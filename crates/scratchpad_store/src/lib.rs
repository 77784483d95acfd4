//! # Scratchpad Store
//!
//! Single-document persistence for the LAN scratchpad.
//!
//! The store owns exactly one text blob. It knows nothing about clients,
//! editors or HTTP; it only reads the current document and overwrites it.
//!
//! ## Design Principles
//!
//! - One document, whole-document granularity
//! - No locking, versioning or diffing: the last `replace` to complete wins
//! - A failed read is a recoverable outcome ([`FetchOutcome::Fallback`]),
//!   never an error surfaced to the caller of [`DocumentStore::fetch`]
//! - Must be `Send + Sync` so the server can share it across requests
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing, with failure injection
//! - [`FileStore`] - For persistent storage in a single UTF-8 file
//!
//! ## Example
//!
//! ```rust
//! use scratchpad_store::{DocumentStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! store.replace("hello world").unwrap();
//! assert_eq!(store.fetch().into_content(), "hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use store::{DocumentStore, FetchOutcome};
