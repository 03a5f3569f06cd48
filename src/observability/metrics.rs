//! Metrics collection and exposition.
//!
//! # Metrics
//! - `waypoint_requests_total` (counter): requests by method, status
//! - `waypoint_request_duration_seconds` (histogram): latency by method
//! - `waypoint_panics_total` (counter): contained handler panics
//! - `waypoint_rate_limited_total` (counter): requests rejected with 429
//! - `waypoint_auth_rejections_total` (counter): auth/RBAC rejections by reason

use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder. The handle renders the scrape body.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics recorder installed");
    Ok(handle)
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "waypoint_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("waypoint_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_panic() {
    counter!("waypoint_panics_total").increment(1);
}

pub fn record_rate_limited() {
    counter!("waypoint_rate_limited_total").increment(1);
}

pub fn record_auth_rejection(reason: &'static str) {
    counter!("waypoint_auth_rejections_total", "reason" => reason).increment(1);
}
