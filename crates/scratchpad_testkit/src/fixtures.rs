//! Test fixtures and document helpers.
//!
//! Provides file-backed documents in temporary directories and a few
//! common starting situations.

use scratchpad_store::{DocumentStore, FileStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// File name used for fixture documents.
pub const FIXTURE_FILE_NAME: &str = "shared_scratchpad.txt";

/// A file-backed document with automatic cleanup.
pub struct TestDocument {
    /// The store over the document file.
    pub store: Arc<FileStore>,
    path: PathBuf,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TestDocument {
    /// Creates an empty document in a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(FIXTURE_FILE_NAME);
        let store = FileStore::open(&path).expect("Failed to create document file");

        Self {
            store: Arc::new(store),
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Creates a document holding `content`.
    pub fn with_content(content: &str) -> Self {
        let document = Self::new();
        document
            .store
            .replace(content)
            .expect("Failed to seed document");
        document
    }

    /// Returns the document file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the directory holding the document.
    pub fn dir(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Reads the file bytes directly, bypassing the store.
    pub fn read_raw(&self) -> Vec<u8> {
        std::fs::read(&self.path).expect("Failed to read document file")
    }

    /// Overwrites the file bytes directly, bypassing the store.
    pub fn write_raw(&self, bytes: &[u8]) {
        std::fs::write(&self.path, bytes).expect("Failed to write document file");
    }
}

impl Default for TestDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDocument {
    type Target = FileStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary file-backed document.
///
/// # Example
///
/// ```rust
/// use scratchpad_store::DocumentStore;
/// use scratchpad_testkit::with_temp_document;
///
/// with_temp_document(|store, path| {
///     store.replace("note").unwrap();
///     assert_eq!(std::fs::read_to_string(path).unwrap(), "note");
/// });
/// ```
pub fn with_temp_document<F, R>(f: F) -> R
where
    F: FnOnce(&FileStore, &Path) -> R,
{
    let document = TestDocument::new();
    f(&document.store, document.path())
}

/// Common starting situations.
pub mod scenarios {
    use super::*;

    /// A document whose file holds bytes that are not valid UTF-8, so
    /// every read fails.
    pub fn unreadable_document() -> TestDocument {
        let document = TestDocument::new();
        document.write_raw(&[0x66, 0x6f, 0xff, 0xfe, 0x6f]);
        document
    }

    /// A document whose file was removed after the store was opened.
    pub fn missing_document() -> TestDocument {
        let document = TestDocument::new();
        std::fs::remove_file(document.path()).expect("Failed to remove document file");
        document
    }

    /// A document of roughly `megabytes` MiB of multi-line text.
    pub fn large_document(megabytes: usize) -> (TestDocument, String) {
        let line = "The quick brown fox jumps over the lazy dog. 0123456789\n";
        let content = line.repeat(megabytes * 1024 * 1024 / line.len() + 1);
        (TestDocument::with_content(&content), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{document_text_strategy, PropTestConfig};
    use proptest::prelude::*;

    #[test]
    fn new_document_is_empty() {
        let document = TestDocument::new();
        assert!(document.path().exists());
        assert_eq!(document.read().unwrap(), "");
    }

    #[test]
    fn seeded_document_is_on_disk() {
        let document = TestDocument::with_content("seed");
        assert_eq!(document.read_raw(), b"seed");
        assert!(document.path().starts_with(document.dir()));
    }

    #[test]
    fn unreadable_scenario_falls_back() {
        let document = scenarios::unreadable_document();
        let outcome = document.fetch();
        assert!(outcome.is_fallback());
        assert_eq!(outcome.content(), "");
    }

    #[test]
    fn missing_scenario_falls_back() {
        let document = scenarios::missing_document();
        assert!(document.fetch().is_fallback());
    }

    #[test]
    fn large_scenario_round_trips() {
        let (document, content) = scenarios::large_document(2);
        assert!(content.len() >= 2 * 1024 * 1024);
        assert_eq!(document.read().unwrap(), content);
    }

    #[test]
    fn crlf_text_is_stored_verbatim() {
        let document = TestDocument::new();
        document.replace("line one\r\nline two\r\n").unwrap();
        assert_eq!(document.read_raw(), b"line one\r\nline two\r\n");
    }

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn file_store_returns_what_was_written(text in document_text_strategy()) {
            let document = TestDocument::new();
            document.replace(&text).unwrap();

            prop_assert_eq!(document.read().unwrap(), text.clone());
            prop_assert_eq!(document.read_raw(), text.into_bytes());
        }

        #[test]
        fn file_store_replace_is_idempotent(
            before in document_text_strategy(),
            text in document_text_strategy(),
        ) {
            let document = TestDocument::with_content(&before);
            document.replace(&text).unwrap();
            document.replace(&text).unwrap();

            let outcome = document.fetch();
            prop_assert!(!outcome.is_fallback());
            prop_assert_eq!(outcome.into_content(), text);
        }
    }
}
