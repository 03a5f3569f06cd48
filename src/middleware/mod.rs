//! Standard middleware.
//!
//! # Data Flow
//! ```text
//! Typical global chain:
//!     → logger.rs (time the rest of the chain, log and record the outcome)
//!     → recovery.rs (contain panics from everything after it)
//!     → rate_limit.rs (429 when a client exceeds its window)
//! Protected group chain:
//!     → auth.rs (verify bearer JWT, attach Identity)
//!     → rbac.rs (check Identity role against path prefixes)
//! ```
//!
//! # Design Decisions
//! - Every middleware is an ordinary chain entry built on the public Context API
//! - Rejection = write a response and do not call `next`
//! - Derived data travels in the Context's typed store, never in route params

pub mod auth;
pub mod logger;
pub mod rate_limit;
pub mod rbac;
pub mod recovery;

pub use auth::{generate_token, jwt_auth, AuthError, Claims, Identity, JwtConfig};
pub use logger::logger;
pub use rate_limit::RateLimiter;
pub use rbac::{rbac, RbacConfig};
pub use recovery::recovery;
