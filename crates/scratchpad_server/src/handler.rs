//! Request handlers for the document endpoints.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use scratchpad_protocol::{decode_request_body, SaveReply};
use scratchpad_store::{DocumentStore, FetchOutcome};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Context for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// The shared document (one per server).
    pub store: Arc<dyn DocumentStore>,
    counters: Counters,
}

#[derive(Default)]
struct Counters {
    fetches: AtomicU64,
    fetch_fallbacks: AtomicU64,
    saves: AtomicU64,
    save_failures: AtomicU64,
}

/// Request counters since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerStats {
    /// Fetch requests served.
    pub fetches: u64,
    /// Fetches answered with empty text because the read failed.
    pub fetch_fallbacks: u64,
    /// Save requests accepted.
    pub saves: u64,
    /// Saves that could not be persisted.
    pub save_failures: u64,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            store,
            counters: Counters::default(),
        }
    }

    /// Returns the request counters.
    pub fn stats(&self) -> HandlerStats {
        let c = &self.counters;
        HandlerStats {
            fetches: c.fetches.load(Ordering::Relaxed),
            fetch_fallbacks: c.fetch_fallbacks.load(Ordering::Relaxed),
            saves: c.saves.load(Ordering::Relaxed),
            save_failures: c.save_failures.load(Ordering::Relaxed),
        }
    }
}

/// Handler for document requests.
///
/// Both operations touch the store synchronously; callers on an async
/// runtime should run them on a blocking thread.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Returns the handler context.
    pub fn context(&self) -> &Arc<HandlerContext> {
        &self.context
    }

    /// Handles `GET /get`.
    ///
    /// Never fails: an unreadable document is served as empty text.
    pub fn handle_fetch(&self) -> String {
        self.context.counters.fetches.fetch_add(1, Ordering::Relaxed);

        match self.context.store.fetch() {
            FetchOutcome::Loaded(content) => {
                debug!(bytes = content.len(), "document fetched");
                content
            }
            FetchOutcome::Fallback(err) => {
                self.context
                    .counters
                    .fetch_fallbacks
                    .fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, "document unreadable, serving empty text");
                String::new()
            }
        }
    }

    /// Handles `POST /save` with the raw request body.
    ///
    /// The body replaces the whole document. Invalid UTF-8 is decoded
    /// lossily. A store failure is reported as [`SaveReply::Failed`]; only
    /// an oversized body is an error.
    pub fn handle_save(&self, body: &[u8]) -> ServerResult<SaveReply> {
        let limit = self.context.config.max_document_bytes;
        if body.len() > limit {
            return Err(ServerError::PayloadTooLarge {
                size: body.len(),
                limit,
            });
        }

        let content = decode_request_body(body);
        self.context.counters.saves.fetch_add(1, Ordering::Relaxed);

        match self.context.store.replace(&content) {
            Ok(()) => {
                debug!(bytes = content.len(), "document saved");
                Ok(SaveReply::Saved)
            }
            Err(err) => {
                self.context
                    .counters
                    .save_failures
                    .fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, "save failed");
                Ok(SaveReply::Failed)
            }
        }
    }
}
