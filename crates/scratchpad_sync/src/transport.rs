//! Transport layer abstraction for the two document operations.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use scratchpad_store::DocumentStore;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A sync transport carries fetch and replace requests to the server.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, direct store access, mock for testing).
/// Both operations are suspension points for the controller; neither can
/// be cancelled once issued.
pub trait SyncTransport: Send + Sync + 'static {
    /// Fetches the current document.
    fn fetch(&self) -> impl Future<Output = SyncResult<String>> + Send;

    /// Replaces the whole document with `content`.
    fn replace(&self, content: &str) -> impl Future<Output = SyncResult<()>> + Send;
}

/// A transport that talks to a [`DocumentStore`] in-process.
///
/// Fetch masks read failures into empty text the same way the server does.
pub struct StoreTransport<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> StoreTransport<S> {
    /// Creates a transport over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S: DocumentStore + 'static> SyncTransport for StoreTransport<S> {
    async fn fetch(&self) -> SyncResult<String> {
        Ok(self.store.fetch().into_content())
    }

    async fn replace(&self, content: &str) -> SyncResult<()> {
        self.store
            .replace(content)
            .map_err(|e| SyncError::SaveRejected(e.to_string()))
    }
}

/// A mock transport for testing.
///
/// Behaves like a server holding one document. Replace calls are recorded
/// when issued, and can be held in flight until released.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    document: Mutex<String>,
    fail_fetch: AtomicBool,
    fail_replace: AtomicBool,
    fetches: AtomicU64,
    replace_calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockTransport {
    /// Creates a new mock transport with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock transport whose document starts as `content`.
    pub fn with_document(content: impl Into<String>) -> Self {
        let transport = Self::new();
        *transport.inner.document.lock() = content.into();
        transport
    }

    /// Returns the document as the mock server currently holds it.
    pub fn document(&self) -> String {
        self.inner.document.lock().clone()
    }

    /// Makes fetch fail with a transport error.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.inner.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Makes replace fail as if the server could not persist.
    pub fn set_fail_replace(&self, fail: bool) {
        self.inner.fail_replace.store(fail, Ordering::SeqCst);
    }

    /// Returns every replace payload in the order issued.
    pub fn replace_calls(&self) -> Vec<String> {
        self.inner.replace_calls.lock().clone()
    }

    /// Returns the number of fetch calls.
    pub fn fetch_count(&self) -> u64 {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    /// Holds subsequent replace calls in flight until released.
    pub fn hold_replaces(&self) {
        *self.inner.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Lets `count` held replace calls complete, in arrival order.
    pub fn release_replaces(&self, count: usize) {
        if let Some(gate) = self.inner.gate.lock().as_ref() {
            gate.add_permits(count);
        }
    }
}

impl SyncTransport for MockTransport {
    async fn fetch(&self) -> SyncResult<String> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_fetch.load(Ordering::SeqCst) {
            return Err(SyncError::transport("mock fetch failure"));
        }
        Ok(self.document())
    }

    async fn replace(&self, content: &str) -> SyncResult<()> {
        self.inner.replace_calls.lock().push(content.to_owned());

        let gate = self.inner.gate.lock().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        if self.inner.fail_replace.load(Ordering::SeqCst) {
            return Err(SyncError::SaveRejected("Error".into()));
        }
        *self.inner.document.lock() = content.to_owned();
        Ok(())
    }
}
