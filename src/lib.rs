//! Waypoint: HTTP request routing and middleware composition.
//!
//! Routes map method + path to handlers through a per-method segment trie
//! (`:name` and trailing `*name` captures). Middleware composes as an
//! onion: each entry calls `Context::next` to delegate to the rest of the
//! chain and runs its post-processing when that returns.
//!
//! ```no_run
//! use waypoint::{Engine, StatusCode};
//!
//! let mut engine = Engine::new();
//! engine.use_middleware(waypoint::middleware::logger());
//! engine.get("/hello/:name", |c| {
//!     let name = c.param("name").unwrap_or_default().to_string();
//!     c.string(StatusCode::OK, format!("hello {}", name));
//! });
//!
//! let mut api = engine.group("/api");
//! api.use_middleware(|c| c.next());
//! api.get("/ping", |c| c.string(StatusCode::OK, "pong"));
//! ```

pub mod app;
pub mod config;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod routing;

pub use axum::http::{Method, StatusCode};
pub use config::ServerConfig;
pub use engine::{Context, Engine, HandlerFunc, RouterGroup};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
