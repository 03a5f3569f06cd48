//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the demo
//! server. All types derive Serde traits for deserialization from TOML.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Panic recovery response format.
    pub recovery: RecoveryConfig,

    /// JWT authentication and RBAC.
    pub auth: AuthConfig,

    /// Sliding-window rate limiting.
    pub rate_limit: RateLimitConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9999").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9999".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log format ("pretty" or "json").
    pub log_format: String,

    /// Expose Prometheus metrics on an engine route.
    pub metrics_enabled: bool,

    /// Route serving the metrics.
    pub metrics_path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_path: "/metrics".to_string(),
        }
    }
}

/// Recovery middleware configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// true: JSON error body, false: plain text.
    pub json: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self { json: true }
    }
}

/// JWT authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Protect the API group with JWT + RBAC.
    pub enabled: bool,

    /// HMAC secret for HS256 tokens.
    pub secret: String,

    /// Lifetime of issued tokens in seconds.
    pub token_ttl_secs: u64,

    /// Prefix of the protected group.
    pub group_prefix: String,

    /// Role → allowed path prefixes.
    pub role_permissions: HashMap<String, Vec<String>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut role_permissions = HashMap::new();
        role_permissions.insert("admin".to_string(), vec!["/api".to_string()]);
        role_permissions.insert("user".to_string(), vec!["/api/public".to_string()]);
        Self {
            enabled: false,
            secret: String::new(),
            token_ttl_secs: 3600,
            group_prefix: "/api".to_string(),
            role_permissions,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Sliding window length in milliseconds.
    pub window_ms: u64,

    /// Requests allowed per client within one window.
    pub max_requests: usize,

    /// Interval of the background purge of idle clients.
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window_ms: 1000,
            max_requests: 5,
            cleanup_interval_secs: 30,
        }
    }
}
