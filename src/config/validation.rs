//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check cross-field rules (auth enabled ⇒ secret set)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),
    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
    #[error("observability.log_format `{0}` is not one of pretty, json")]
    UnknownLogFormat(String),
    #[error("observability.metrics_path `{0}` must start with `/`")]
    InvalidMetricsPath(String),
    #[error("auth.secret must be set when auth is enabled")]
    MissingSecret,
    #[error("auth.token_ttl_secs must be greater than zero")]
    ZeroTokenTtl,
    #[error("auth.group_prefix `{0}` must start with `/`")]
    InvalidGroupPrefix(String),
    #[error("auth.role_permissions.{role}: prefix `{prefix}` must start with `/`")]
    InvalidPermissionPrefix { role: String, prefix: String },
    #[error("rate_limit.window_ms must be greater than zero")]
    ZeroWindow,
    #[error("rate_limit.max_requests must be greater than zero")]
    ZeroMaxRequests,
    #[error("rate_limit.cleanup_interval_secs must be greater than zero")]
    ZeroCleanupInterval,
}

/// Check every semantic rule and collect all failures.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }
    if !LOG_FORMATS.contains(&observability.log_format.as_str()) {
        errors.push(ValidationError::UnknownLogFormat(observability.log_format.clone()));
    }
    if observability.metrics_enabled && !observability.metrics_path.starts_with('/') {
        errors.push(ValidationError::InvalidMetricsPath(observability.metrics_path.clone()));
    }

    let auth = &config.auth;
    if auth.enabled {
        if auth.secret.is_empty() {
            errors.push(ValidationError::MissingSecret);
        }
        if auth.token_ttl_secs == 0 {
            errors.push(ValidationError::ZeroTokenTtl);
        }
        if !auth.group_prefix.starts_with('/') {
            errors.push(ValidationError::InvalidGroupPrefix(auth.group_prefix.clone()));
        }
        let mut roles: Vec<_> = auth.role_permissions.iter().collect();
        roles.sort_by(|a, b| a.0.cmp(b.0));
        for (role, prefixes) in roles {
            for prefix in prefixes.iter().filter(|p| !p.starts_with('/')) {
                errors.push(ValidationError::InvalidPermissionPrefix {
                    role: role.clone(),
                    prefix: prefix.clone(),
                });
            }
        }
    }

    let rate_limit = &config.rate_limit;
    if rate_limit.enabled {
        if rate_limit.window_ms == 0 {
            errors.push(ValidationError::ZeroWindow);
        }
        if rate_limit.max_requests == 0 {
            errors.push(ValidationError::ZeroMaxRequests);
        }
        if rate_limit.cleanup_interval_secs == 0 {
            errors.push(ValidationError::ZeroCleanupInterval);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("nowhere".into()),
                ValidationError::ZeroRequestTimeout,
                ValidationError::UnknownLogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn test_auth_rules_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.auth.secret.clear();
        assert!(validate_config(&config).is_ok());

        config.auth.enabled = true;
        config
            .auth
            .role_permissions
            .insert("guest".into(), vec!["public".into()]);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingSecret));
        assert!(errors.contains(&ValidationError::InvalidPermissionPrefix {
            role: "guest".into(),
            prefix: "public".into(),
        }));
    }

    #[test]
    fn test_rate_limit_rules() {
        let mut config = ServerConfig::default();
        config.rate_limit.enabled = true;
        config.rate_limit.window_ms = 0;
        config.rate_limit.max_requests = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ZeroWindow, ValidationError::ZeroMaxRequests]
        );
    }
}
