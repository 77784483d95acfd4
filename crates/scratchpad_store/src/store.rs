//! Document store trait definition.

use crate::error::{StoreError, StoreResult};

/// Persistence for the single shared document.
///
/// # Invariants
///
/// - `replace(t)` followed by `read()` yields exactly `t` when both succeed
/// - `replace` overwrites the whole document; it never appends or merges
/// - Concurrent `replace` calls are not serialized beyond what the medium
///   provides; whichever completes last is what later reads observe
/// - Implementations must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait DocumentStore: Send + Sync {
    /// Reads the persisted document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing, unreadable, or not
    /// valid UTF-8.
    fn read(&self) -> StoreResult<String>;

    /// Overwrites the persisted document with `content`.
    ///
    /// On failure the previous content is left unchanged or, for media
    /// without atomic writes, in an unspecified partial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn replace(&self, content: &str) -> StoreResult<()>;

    /// Reads the document, substituting empty text on any read failure.
    ///
    /// This never fails. Callers that care why the document came back
    /// empty can inspect [`FetchOutcome::Fallback`].
    fn fetch(&self) -> FetchOutcome {
        match self.read() {
            Ok(content) => FetchOutcome::Loaded(content),
            Err(err) => FetchOutcome::Fallback(err),
        }
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    fn read(&self) -> StoreResult<String> {
        (**self).read()
    }

    fn replace(&self, content: &str) -> StoreResult<()> {
        (**self).replace(content)
    }
}

/// Result of [`DocumentStore::fetch`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// The document was read successfully.
    Loaded(String),
    /// The read failed; the document is treated as empty.
    Fallback(StoreError),
}

impl FetchOutcome {
    /// Returns the document text, or `""` for a fallback.
    pub fn content(&self) -> &str {
        match self {
            FetchOutcome::Loaded(content) => content,
            FetchOutcome::Fallback(_) => "",
        }
    }

    /// Consumes the outcome and returns the document text.
    pub fn into_content(self) -> String {
        match self {
            FetchOutcome::Loaded(content) => content,
            FetchOutcome::Fallback(_) => String::new(),
        }
    }

    /// Returns true if the read failed and empty text was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback(_))
    }

    /// Returns the read failure, if any.
    pub fn failure(&self) -> Option<&StoreError> {
        match self {
            FetchOutcome::Loaded(_) => None,
            FetchOutcome::Fallback(err) => Some(err),
        }
    }
}
