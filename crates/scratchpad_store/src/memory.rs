//! In-memory store for testing.

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// An in-memory document store.
///
/// This store keeps the document in memory and is suitable for:
/// - Unit tests
/// - Integration tests that need to simulate an unreadable or unwritable
///   medium (see [`set_fail_reads`](Self::set_fail_reads) and
///   [`set_fail_writes`](Self::set_fail_writes))
///
/// # Example
///
/// ```rust
/// use scratchpad_store::{DocumentStore, InMemoryStore};
///
/// let store = InMemoryStore::with_content("hello");
/// store.set_fail_reads(true);
/// assert_eq!(store.fetch().content(), "");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    content: RwLock<String>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicU64,
}

impl InMemoryStore {
    /// Creates a store holding an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `content`.
    #[must_use]
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: RwLock::new(content.into()),
            ..Self::default()
        }
    }

    /// Returns a copy of the stored document, ignoring injected failures.
    #[must_use]
    pub fn content(&self) -> String {
        self.content.read().clone()
    }

    /// Returns the number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes subsequent reads fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail, leaving the document untouched.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl DocumentStore for InMemoryStore {
    fn read(&self) -> StoreResult<String> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(self.content.read().clone())
    }

    fn replace(&self, content: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        *self.content.write() = content.to_owned();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn memory_new_is_empty() {
        let store = InMemoryStore::new();
        assert_eq!(store.read().unwrap(), "");
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn memory_with_content() {
        let store = InMemoryStore::with_content("preloaded");
        assert_eq!(store.fetch().content(), "preloaded");
    }

    #[test]
    fn memory_replace_is_whole_document() {
        let store = InMemoryStore::with_content("hello");
        store.replace("hello world").unwrap();
        store.replace("bye").unwrap();
        assert_eq!(store.content(), "bye");
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn memory_failed_read_falls_back() {
        let store = InMemoryStore::with_content("hidden");
        store.set_fail_reads(true);

        assert!(matches!(store.read(), Err(StoreError::Unavailable(_))));
        assert_eq!(store.fetch().into_content(), "");

        store.set_fail_reads(false);
        assert_eq!(store.fetch().into_content(), "hidden");
    }

    #[test]
    fn memory_failed_write_keeps_previous_content() {
        let store = InMemoryStore::with_content("before");
        store.set_fail_writes(true);

        assert!(store.replace("after").is_err());
        assert_eq!(store.content(), "before");
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn memory_last_completed_write_wins() {
        let store = InMemoryStore::new();
        // Completion order decides, not issue order.
        store.replace("A").unwrap();
        store.replace("B").unwrap();
        assert_eq!(store.fetch().into_content(), "B");
    }

    proptest! {
        #[test]
        fn memory_round_trip(text in ".{0,256}") {
            let store = InMemoryStore::new();
            store.replace(&text).unwrap();
            prop_assert_eq!(store.fetch().into_content(), text);
        }

        #[test]
        fn memory_replace_is_idempotent(text in ".{0,256}") {
            let once = InMemoryStore::new();
            once.replace(&text).unwrap();

            let twice = InMemoryStore::new();
            twice.replace(&text).unwrap();
            twice.replace(&text).unwrap();

            prop_assert_eq!(once.fetch().into_content(), twice.fetch().into_content());
        }
    }
}
