//! Cross-crate integration test helpers.
//!
//! [`ServerHarness`] drives the real HTTP application in-process, without
//! a socket, so client-side tests can exercise the full request path.

use crate::fixtures::TestDocument;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;
use scratchpad_protocol::{Endpoint, Method};
use scratchpad_server::{HandlerStats, ScratchpadServer, ServerConfig};
use scratchpad_store::DocumentStore;
use std::sync::Arc;
use tower::ServiceExt;

/// A scratchpad server reachable through in-process requests.
pub struct ServerHarness {
    server: ScratchpadServer,
    router: Router,
    document: Option<TestDocument>,
}

impl ServerHarness {
    /// Creates a harness over a temporary file-backed document.
    pub fn new() -> Self {
        Self::with_document(TestDocument::new())
    }

    /// Creates a harness over an existing fixture document.
    pub fn with_document(document: TestDocument) -> Self {
        let config = ServerConfig::default().with_data_file(document.path());
        let store: Arc<dyn DocumentStore> = document.store.clone();
        let mut harness = Self::with_store(config, store);
        harness.document = Some(document);
        harness
    }

    /// Creates a harness over any store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        let server = ScratchpadServer::with_store(config, store);
        let router = server.router();
        Self {
            server,
            router,
            document: None,
        }
    }

    /// Returns the server.
    pub fn server(&self) -> &ScratchpadServer {
        &self.server
    }

    /// Returns the fixture document, if the harness is file-backed.
    pub fn document(&self) -> Option<&TestDocument> {
        self.document.as_ref()
    }

    /// Returns the request counters.
    pub fn stats(&self) -> HandlerStats {
        self.server.stats()
    }

    /// Sends a request and returns status and body text.
    pub async fn request(&self, method: Method, path: &str, body: String) -> (u16, String) {
        let request = Request::builder()
            .method(method.as_str())
            .uri(path)
            .body(Body::from(body))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status().as_u16();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fetches the document as a client would.
    pub async fn fetch(&self) -> String {
        let (status, body) = self
            .request(Endpoint::Fetch.method(), Endpoint::Fetch.path(), String::new())
            .await;
        assert_eq!(status, 200, "fetch must always succeed");
        body
    }

    /// Saves `content` as a client would and returns the status code.
    pub async fn save(&self, content: &str) -> u16 {
        self.request(Endpoint::Save.method(), Endpoint::Save.path(), content.to_owned())
            .await
            .0
    }
}

impl Default for ServerHarness {
    fn default() -> Self {
        Self::new()
    }
}
