//! # Scratchpad Testkit
//!
//! Test utilities for the LAN scratchpad.
//!
//! This crate provides:
//! - Temporary file-backed documents and failure scenarios
//! - Property-based test generators using proptest
//! - An in-process server harness for cross-crate tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scratchpad_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn save_round_trip() {
//!     let harness = ServerHarness::new();
//!     harness.save("note").await;
//!     assert_eq!(harness.fetch().await, "note");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
