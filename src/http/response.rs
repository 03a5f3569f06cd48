//! Response conversion for the transport.
//!
//! # Responsibilities
//! - Turn the engine's buffered `Response<Bytes>` into an axum response
//! - Map transport-level failures to status codes
//!
//! # Design Decisions
//! - Handler panics that escape the chain become 500, never a dropped connection

use axum::body::{Body, Bytes};
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;

/// Convert an engine response.
pub fn into_axum(response: Response<Bytes>) -> axum::response::Response {
    response.map(Body::from)
}

/// Response for a request whose handling panicked outside any recovery middleware.
pub fn internal_error() -> axum::response::Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

/// Response for a body that could not be read.
pub fn bad_body() -> axum::response::Response {
    (StatusCode::BAD_REQUEST, "failed to read request body").into_response()
}
