//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{Method, Request, Response};
use serde_json::Value;
use waypoint::Context;

/// Build a GET request with an empty body.
pub fn get(path: &str) -> Request<Bytes> {
    request(Method::GET, path, "")
}

/// Build a request with the given method and body.
pub fn request(method: Method, path: &str, body: &'static str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

/// Parse an engine response body as JSON.
pub fn body_json(response: &Response<Bytes>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

/// Engine response body as UTF-8 text.
pub fn body_text(response: &Response<Bytes>) -> String {
    String::from_utf8(response.body().to_vec()).unwrap()
}

/// Ordered record of chain events shared across middleware.
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    /// Middleware recording `name:before` and `name:after` around `next`.
    pub fn around(&self, name: &'static str) -> impl Fn(&mut Context) + Send + Sync + 'static {
        let trace = self.clone();
        move |c: &mut Context| {
            trace.push(format!("{}:before", name));
            c.next();
            trace.push(format!("{}:after", name));
        }
    }

    /// Handler recording `name` and answering 200 with `name` as body.
    pub fn handler(&self, name: &'static str) -> impl Fn(&mut Context) + Send + Sync + 'static {
        let trace = self.clone();
        move |c: &mut Context| {
            trace.push(name);
            c.string(waypoint::StatusCode::OK, name);
        }
    }
}
