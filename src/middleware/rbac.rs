//! Role-based access control middleware.
//!
//! Reads the `Identity` attached by the JWT middleware and allows the
//! request when one of the role's prefixes covers the path on a `/`
//! boundary.

use std::collections::HashMap;

use axum::http::StatusCode;
use serde_json::json;

use crate::engine::Context;
use crate::middleware::auth::Identity;
use crate::observability::metrics;
use crate::routing::match_prefix;

/// Role → allowed path prefixes.
#[derive(Debug, Clone, Default)]
pub struct RbacConfig {
    pub role_permissions: HashMap<String, Vec<String>>,
}

impl RbacConfig {
    /// Whether `role` may access `path`.
    pub fn allows(&self, role: &str, path: &str) -> bool {
        self.role_permissions
            .get(role)
            .map(|prefixes| prefixes.iter().any(|prefix| match_prefix(path, prefix)))
            .unwrap_or(false)
    }
}

/// Build the RBAC middleware.
pub fn rbac(config: RbacConfig) -> impl Fn(&mut Context) + Send + Sync + 'static {
    move |c: &mut Context| {
        let role = c
            .extensions()
            .get::<Identity>()
            .map(|identity| identity.role.clone())
            .filter(|role| !role.is_empty());

        let Some(role) = role else {
            metrics::record_auth_rejection("role_required");
            c.json(StatusCode::FORBIDDEN, &json!({ "error": "role required" }));
            return;
        };

        if config.allows(&role, c.path()) {
            c.next();
        } else {
            tracing::debug!(role = %role, path = %c.path(), "Access denied");
            metrics::record_auth_rejection("insufficient_permissions");
            c.json(
                StatusCode::FORBIDDEN,
                &json!({ "error": "insufficient permissions" }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use axum::body::Bytes;
    use axum::http::Request;

    fn config() -> RbacConfig {
        let mut role_permissions = HashMap::new();
        role_permissions.insert("admin".to_string(), vec!["/api".to_string()]);
        role_permissions.insert("user".to_string(), vec!["/api/public".to_string()]);
        RbacConfig { role_permissions }
    }

    fn engine_with_role(role: Option<&'static str>) -> Engine {
        let mut engine = Engine::new();
        engine
            .use_middleware(move |c| {
                if let Some(role) = role {
                    c.extensions_mut().insert(Identity {
                        subject: "1".into(),
                        role: role.into(),
                    });
                }
                c.next();
            })
            .use_middleware(rbac(config()))
            .get("/api/secret", |c| c.string(StatusCode::OK, "secret"))
            .get("/api/public/info", |c| c.string(StatusCode::OK, "info"));
        engine
    }

    fn get(path: &str) -> Request<Bytes> {
        Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_rbac_reject() {
        let response = engine_with_role(Some("user")).handle(get("/api/secret"));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.body().as_ref(),
            br#"{"error":"insufficient permissions"}"#
        );
    }

    #[test]
    fn test_rbac_allow() {
        let engine = engine_with_role(Some("user"));
        assert_eq!(engine.handle(get("/api/public/info")).status(), StatusCode::OK);

        let engine = engine_with_role(Some("admin"));
        assert_eq!(engine.handle(get("/api/secret")).status(), StatusCode::OK);
    }

    #[test]
    fn test_role_required() {
        let response = engine_with_role(None).handle(get("/api/secret"));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.body().as_ref(), br#"{"error":"role required"}"#);
    }

    #[test]
    fn test_denied_role_never_reaches_handler() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut engine = Engine::new();
        engine.use_middleware(rbac(config())).get("/api/secret", move |c| {
            counter.fetch_add(1, Ordering::SeqCst);
            c.string(StatusCode::OK, "secret");
        });

        let response = engine.handle(get("/api/secret"));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_allows_respects_boundary() {
        let config = config();
        assert!(config.allows("user", "/api/public"));
        assert!(!config.allows("user", "/api/publicity"));
        assert!(!config.allows("ghost", "/api"));
    }
}
