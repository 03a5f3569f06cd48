//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → used once at startup to build the engine and server
//! ```
//!
//! # Design Decisions
//! - Config is read once; routes and middleware are frozen before serving
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AuthConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, RecoveryConfig,
    ServerConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
