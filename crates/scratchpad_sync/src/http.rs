//! HTTP transport implementation.
//!
//! This module maps the two document operations onto `GET /get` and
//! `POST /save`. The actual HTTP client is abstracted via a trait so any
//! client library, or an in-process router, can sit underneath.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::transport::SyncTransport;
use parking_lot::RwLock;
use scratchpad_protocol::{decode_fetch_reply, Endpoint, Method, SaveReply};
use std::future::Future;

/// Status and body of an HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpReply {
    /// Creates a reply.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. An `Err`
/// means no reply was received at all (connection refused, reset, ...).
pub trait HttpClient: Send + Sync + 'static {
    /// Sends a `GET` request.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpReply, String>> + Send;

    /// Sends a `POST` request with a plain-text body.
    fn post_text(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<HttpReply, String>> + Send;
}

/// HTTP-based sync transport.
pub struct HttpTransport<C: HttpClient> {
    /// Base URL of the server (e.g., "http://192.168.1.20:5000").
    base_url: String,
    /// HTTP client implementation.
    client: C,
    /// Last error message.
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            last_error: RwLock::new(None),
        }
    }

    /// Creates a transport talking to the server named in `config`.
    pub fn from_config(config: &SyncConfig, client: C) -> Self {
        Self::new(config.server_url.clone(), client)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the last transport error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    fn record(&self, result: Result<HttpReply, String>) -> SyncResult<HttpReply> {
        match result {
            Ok(reply) => {
                *self.last_error.write() = None;
                Ok(reply)
            }
            Err(message) => {
                *self.last_error.write() = Some(message.clone());
                Err(SyncError::Transport(message))
            }
        }
    }
}

impl<C: HttpClient> SyncTransport for HttpTransport<C> {
    async fn fetch(&self) -> SyncResult<String> {
        let url = Endpoint::Fetch.url(&self.base_url);
        let reply = self.record(self.client.get(&url).await)?;
        Ok(decode_fetch_reply(reply.status, reply.body)?)
    }

    async fn replace(&self, content: &str) -> SyncResult<()> {
        let url = Endpoint::Save.url(&self.base_url);
        let reply = self.record(self.client.post_text(&url, content.to_owned()).await)?;

        match SaveReply::decode(reply.status, &reply.body)? {
            SaveReply::Saved => Ok(()),
            SaveReply::Failed => Err(SyncError::SaveRejected(reply.body)),
        }
    }
}

/// Trait for servers that can handle loopback requests.
pub trait LoopbackServer: Send + Sync + 'static {
    /// Handles a request for `path` and returns the reply.
    fn handle(
        &self,
        method: Method,
        path: &str,
        body: String,
    ) -> impl Future<Output = Result<HttpReply, String>> + Send;
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing without actual network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer> LoopbackClient<S> {
    /// Creates a new loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }
}

impl<S: LoopbackServer> HttpClient for LoopbackClient<S> {
    async fn get(&self, url: &str) -> Result<HttpReply, String> {
        self.server
            .handle(Method::Get, request_path(url), String::new())
            .await
    }

    async fn post_text(&self, url: &str, body: String) -> Result<HttpReply, String> {
        self.server
            .handle(Method::Post, request_path(url), body)
            .await
    }
}

/// Strips scheme and authority from a URL, leaving the path.
fn request_path(url: &str) -> &str {
    let rest = url.find("://").map_or(url, |i| &url[i + 3..]);
    rest.find('/').map_or("/", |i| &rest[i..])
}
