//! Request preparation for the engine.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Buffer the request body into `Request<Bytes>`
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body size is capped by `RequestBodyLimitLayer` before buffering

use axum::body::{Body, Bytes};
use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 request ID for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(id))
    }
}

/// Buffer the body so the engine can run synchronously.
pub async fn buffer_request(request: Request<Body>) -> Result<Request<Bytes>, axum::Error> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await?;
    Ok(Request::from_parts(parts, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_uuid() {
        let request = Request::new(());
        let id = MakeRequestUuidV4.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[tokio::test]
    async fn test_buffer_request_keeps_parts() {
        let request = Request::builder()
            .uri("/upload")
            .header("x-kind", "file")
            .body(Body::from("payload"))
            .unwrap();

        let buffered = buffer_request(request).await.unwrap();
        assert_eq!(buffered.uri().path(), "/upload");
        assert_eq!(buffered.headers()["x-kind"], "file");
        assert_eq!(buffered.body().as_ref(), b"payload");
    }
}
