//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum/hyper, layers: request id, trace, timeout, body limit)
//!     → request.rs (buffer body, build Request<Bytes>)
//!     → Engine::handle on the blocking pool
//!     → response.rs (Response<Bytes> → axum response)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - The engine is synchronous; the transport owns all async concerns
//! - A panic that escapes the chain fails only its own request (500)
//! - Timeouts are a transport concern, the engine has no deadlines

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::HttpServer;
