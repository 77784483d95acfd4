//! Main scratchpad server.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerContext, HandlerStats, RequestHandler};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use scratchpad_protocol::{Endpoint, SaveReply, HTML_CONTENT_TYPE, TEXT_CONTENT_TYPE};
use scratchpad_store::{DocumentStore, FileStore};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// The editor page served at `/`.
pub const EDITOR_PAGE: &str = include_str!("../assets/index.html");

/// The scratchpad server.
///
/// Serves one shared document over three routes: the editor page, a
/// fetch of the whole text, and a whole-text save. Concurrent saves are
/// not coordinated; the last one to reach the store wins.
///
/// # Example
///
/// ```
/// use scratchpad_server::{ScratchpadServer, ServerConfig};
/// use scratchpad_store::InMemoryStore;
/// use std::sync::Arc;
///
/// let server = ScratchpadServer::with_store(
///     ServerConfig::default(),
///     Arc::new(InMemoryStore::with_content("hello")),
/// );
/// assert_eq!(server.handler().handle_fetch(), "hello");
///
/// // `server.router()` is the axum application; `server.serve()` binds it.
/// ```
pub struct ScratchpadServer {
    handler: Arc<RequestHandler>,
    context: Arc<HandlerContext>,
}

impl ScratchpadServer {
    /// Creates a server over the configured data file, creating it empty
    /// if it does not exist.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = FileStore::open(&config.data_file)?.with_sync_on_write(config.sync_writes);
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Creates a server over an existing store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        let context = Arc::new(HandlerContext::new(config, store));
        let handler = Arc::new(RequestHandler::new(Arc::clone(&context)));

        Self { handler, context }
    }

    /// Returns the request handler.
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Returns the request counters.
    pub fn stats(&self) -> HandlerStats {
        self.context.stats()
    }

    /// Builds the HTTP application.
    pub fn router(&self) -> Router {
        Router::new()
            .route(Endpoint::Page.path(), get(page))
            .route(Endpoint::Fetch.path(), get(fetch))
            .route(Endpoint::Save.path(), post(save))
            .layer(DefaultBodyLimit::max(self.config().max_document_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.handler))
    }

    /// Binds the configured address.
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        let addr = self.config().bind_addr;
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Binds and serves until the process ends.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Binds and serves until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// Requests in progress are allowed to finish.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local: SocketAddr = listener.local_addr()?;
        info!(
            addr = %local,
            data_file = %self.config().data_file.display(),
            "scratchpad listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("scratchpad stopped");
        Ok(())
    }
}

async fn page() -> Response {
    ([(CONTENT_TYPE, HTML_CONTENT_TYPE)], EDITOR_PAGE).into_response()
}

async fn fetch(State(handler): State<Arc<RequestHandler>>) -> Response {
    let content = tokio::task::spawn_blocking(move || handler.handle_fetch())
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "fetch task failed");
            String::new()
        });

    ([(CONTENT_TYPE, TEXT_CONTENT_TYPE)], content).into_response()
}

async fn save(State(handler): State<Arc<RequestHandler>>, body: Bytes) -> Response {
    let result = tokio::task::spawn_blocking(move || handler.handle_save(&body))
        .await
        .unwrap_or_else(|e| Err(ServerError::Internal(format!("save task failed: {e}"))));

    match result {
        Ok(reply) => text_reply(status_of(reply), reply.body()),
        Err(err) if err.is_client_error() => {
            text_reply(StatusCode::PAYLOAD_TOO_LARGE, &err.to_string())
        }
        Err(err) => {
            error!(error = %err, "save could not be handled");
            text_reply(status_of(SaveReply::Failed), SaveReply::Failed.body())
        }
    }
}

fn status_of(reply: SaveReply) -> StatusCode {
    StatusCode::from_u16(reply.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn text_reply(status: StatusCode, body: &str) -> Response {
    (status, [(CONTENT_TYPE, TEXT_CONTENT_TYPE)], body.to_owned()).into_response()
}
