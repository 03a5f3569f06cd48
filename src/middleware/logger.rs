//! Request logging middleware.

use std::time::Instant;

use crate::engine::Context;
use crate::observability::metrics;

/// Log method, path, status and latency once the rest of the chain finished.
pub fn logger() -> impl Fn(&mut Context) + Send + Sync + 'static {
    |c: &mut Context| {
        let start = Instant::now();
        c.next();

        let status = c.status_code().as_u16();
        tracing::info!(
            request_id = c.header("x-request-id").unwrap_or("-"),
            method = %c.method(),
            path = %c.path(),
            status,
            elapsed = ?start.elapsed(),
            "Request completed"
        );
        metrics::record_request(c.method().as_str(), status, start);
    }
}
