//! Per-request context.
//!
//! # Responsibilities
//! - Expose the request (method, path, headers, body) and resolved params
//! - Carry a typed request-scoped store for data attached by middleware
//! - Drive the handler chain with a shared cursor (`next`)
//! - Buffer the response (status, headers, body)
//!
//! # Chain execution
//! `next` advances the cursor and runs handlers until the cursor passes the
//! end. A handler that calls `next` itself runs the rest of the chain before
//! its own post-processing, so with `[A, B, handler]`:
//! ```text
//! A-before → B-before → handler → B-after → A-after
//! ```
//! A handler that returns without calling `next` short-circuits the chain:
//! no later entry runs, the resolved handler included. Rejecting a request
//! therefore means writing a response and returning. `abort` skips every
//! remaining entry explicitly, e.g. after a contained panic.
//!
//! # Response contract
//! The first status write commits the status; later writes are ignored and
//! logged. Headers set after the commit are ignored. Body writes without a
//! committed status commit `200 OK`.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::{Extensions, HeaderMap, Method, Request, Response, StatusCode};
use serde::Serialize;

use crate::engine::HandlerFunc;

/// Context for a single request. Never shared between requests.
pub struct Context {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    extensions: Extensions,

    handlers: Vec<HandlerFunc>,
    index: isize,

    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Vec<u8>,
    wrote_header: bool,
}

impl Context {
    /// Create a context from a buffered request.
    ///
    /// Request extensions (e.g. `ConnectInfo`) move into the context's
    /// request-scoped store.
    pub fn new(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            body,
            params: HashMap::new(),
            extensions: parts.extensions,
            handlers: Vec::new(),
            index: -1,
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: Vec::new(),
            wrote_header: false,
        }
    }

    pub(crate) fn set_handlers(&mut self, handlers: Vec<HandlerFunc>) {
        self.handlers = handlers;
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Request header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Route parameter captured by `:name` or `*name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Typed request-scoped store, keyed by type.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Run the remaining handlers of the chain.
    pub fn next(&mut self) {
        self.index += 1;
        while let Some(handler) = self.current_handler() {
            let entered = self.index;
            handler(self);
            if self.index == entered {
                // Returned without delegating.
                self.abort();
                break;
            }
            self.index += 1;
        }
    }

    fn current_handler(&self) -> Option<HandlerFunc> {
        let index = usize::try_from(self.index).ok()?;
        self.handlers.get(index).cloned()
    }

    /// Skip every handler that has not started yet.
    pub fn abort(&mut self) {
        let end = self.handlers.len() as isize;
        self.index = self.index.max(end);
    }

    /// True once no chain entry is left to start.
    pub fn is_finished(&self) -> bool {
        self.index >= self.handlers.len() as isize
    }

    /// Commit the response status.
    pub fn status(&mut self, code: StatusCode) {
        if self.wrote_header {
            tracing::warn!(
                path = %self.path,
                committed = %self.status,
                ignored = %code,
                "Superfluous status write ignored"
            );
            return;
        }
        self.status = code;
        self.wrote_header = true;
    }

    /// Set a response header. Ignored once the status is committed.
    pub fn set_header(&mut self, key: &str, value: &str) {
        if self.wrote_header {
            tracing::warn!(path = %self.path, header = %key, "Header set after status was committed");
            return;
        }
        match (
            HeaderName::try_from(key),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.response_headers.insert(name, value);
            }
            _ => {
                tracing::warn!(header = %key, "Invalid response header ignored");
            }
        }
    }

    /// Plain text response.
    pub fn string(&mut self, code: StatusCode, body: impl AsRef<str>) {
        self.set_header(header::CONTENT_TYPE.as_str(), "text/plain; charset=utf-8");
        self.status(code);
        self.write(body.as_ref().as_bytes());
    }

    /// JSON response.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.set_header(header::CONTENT_TYPE.as_str(), "application/json; charset=utf-8");
                self.status(code);
                self.write(&bytes);
            }
            Err(e) => {
                tracing::error!(path = %self.path, error = %e, "Failed to serialize JSON response");
                self.status(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    /// Raw bytes response.
    pub fn data(&mut self, code: StatusCode, data: impl AsRef<[u8]>) {
        self.status(code);
        self.write(data.as_ref());
    }

    /// HTML response.
    pub fn html(&mut self, code: StatusCode, html: impl AsRef<str>) {
        self.set_header(header::CONTENT_TYPE.as_str(), "text/html; charset=utf-8");
        self.status(code);
        self.write(html.as_ref().as_bytes());
    }

    fn write(&mut self, bytes: &[u8]) {
        if !self.wrote_header {
            self.status(StatusCode::OK);
        }
        self.response_body.extend_from_slice(bytes);
    }

    /// Status that will be sent (200 until something is committed).
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn is_written(&self) -> bool {
        self.wrote_header
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn response_body(&self) -> &[u8] {
        &self.response_body
    }

    /// Drop the buffered status, headers and body so a new response can be written.
    pub fn clear_response(&mut self) {
        self.status = StatusCode::OK;
        self.response_headers.clear();
        self.response_body.clear();
        self.wrote_header = false;
    }

    /// Consume the context into the buffered response.
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(Bytes::from(self.response_body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.response_headers;
        response
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("status", &self.status)
            .finish()
    }
}
