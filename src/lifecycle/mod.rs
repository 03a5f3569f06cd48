//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build engine (routes, groups, middleware) → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → server drains, background tasks stop → Exit
//! ```
//!
//! # Design Decisions
//! - Registration completes before the listener accepts traffic
//! - One broadcast channel fans the shutdown signal out to every task

pub mod shutdown;

pub use shutdown::Shutdown;
