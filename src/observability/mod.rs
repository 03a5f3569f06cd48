//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware and transport produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape of the engine's metrics route
//! ```
//!
//! # Design Decisions
//! - The engine core stays silent on the hot path; logging is a middleware concern
//! - Recording without an installed recorder is a no-op, so tests need no setup

pub mod logging;
pub mod metrics;
