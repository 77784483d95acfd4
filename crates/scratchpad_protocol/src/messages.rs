//! Endpoints and reply codecs.

use crate::error::{ProtocolError, ProtocolResult};

/// Content type for document bodies.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Content type for the editor page.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Body of a successful `/save` reply.
pub const SAVE_OK_BODY: &str = "OK";

/// Body of a failed `/save` reply.
pub const SAVE_ERROR_BODY: &str = "Error";

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// Returns the method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// The routes the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /` - the editor page.
    Page,
    /// `GET /get` - the current document.
    Fetch,
    /// `POST /save` - replace the document.
    Save,
}

impl Endpoint {
    /// Returns the request path.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Page => "/",
            Endpoint::Fetch => "/get",
            Endpoint::Save => "/save",
        }
    }

    /// Returns the request method.
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Page | Endpoint::Fetch => Method::Get,
            Endpoint::Save => Method::Post,
        }
    }

    /// Joins the endpoint path onto a base URL such as `http://host:5000`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

/// Outcome of a `/save` request as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReply {
    /// The document was replaced.
    Saved,
    /// The server could not persist the document.
    Failed,
}

impl SaveReply {
    /// Returns the HTTP status code for this reply.
    pub fn status_code(&self) -> u16 {
        match self {
            SaveReply::Saved => 200,
            SaveReply::Failed => 500,
        }
    }

    /// Returns the reply body.
    pub fn body(&self) -> &'static str {
        match self {
            SaveReply::Saved => SAVE_OK_BODY,
            SaveReply::Failed => SAVE_ERROR_BODY,
        }
    }

    /// Returns true if the document was replaced.
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveReply::Saved)
    }

    /// Interprets a raw `/save` reply.
    ///
    /// Any 2xx counts as saved and any 5xx as a failed save, whatever the
    /// body says. Other statuses are outside the contract.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnexpectedStatus`] for non-2xx, non-5xx
    /// statuses.
    pub fn decode(status: u16, _body: &str) -> ProtocolResult<Self> {
        match status {
            200..=299 => Ok(SaveReply::Saved),
            500..=599 => Ok(SaveReply::Failed),
            _ => Err(ProtocolError::UnexpectedStatus {
                path: Endpoint::Save.path(),
                status,
            }),
        }
    }
}

/// Interprets a raw `/get` reply, returning the document text.
///
/// # Errors
///
/// Returns [`ProtocolError::UnexpectedStatus`] unless the status is 200;
/// the server masks its own read failures, so anything else came from
/// somewhere in between.
pub fn decode_fetch_reply(status: u16, body: String) -> ProtocolResult<String> {
    if status == 200 {
        Ok(body)
    } else {
        Err(ProtocolError::UnexpectedStatus {
            path: Endpoint::Fetch.path(),
            status,
        })
    }
}

/// Decodes a `/save` request body into document text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than rejected.
pub fn decode_request_body(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
