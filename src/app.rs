//! Demo application assembly.
//!
//! Builds the engine served by the `waypoint` binary from a `ServerConfig`:
//! global logger and recovery, optional rate limiting, a handful of public
//! routes, and an API group guarded by JWT + RBAC when auth is enabled.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;

use crate::config::ServerConfig;
use crate::engine::Engine;
use crate::lifecycle::Shutdown;
use crate::middleware::{jwt_auth, logger, rbac, recovery, Identity, JwtConfig, RateLimiter, RbacConfig};

/// Build the demo engine. Must run inside a Tokio runtime when rate
/// limiting is enabled (the cleanup task is spawned here).
pub fn build_engine(
    config: &ServerConfig,
    shutdown: &Shutdown,
    metrics: Option<PrometheusHandle>,
) -> Engine {
    let mut engine = Engine::new();
    engine
        .use_middleware(logger())
        .use_middleware(recovery(config.recovery.clone()));

    if config.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::new(
            Duration::from_millis(config.rate_limit.window_ms),
            config.rate_limit.max_requests,
        ));
        limiter.clone().spawn_cleanup(
            Duration::from_secs(config.rate_limit.cleanup_interval_secs),
            shutdown.subscribe(),
        );
        engine.use_middleware(limiter.middleware());
    }

    engine
        .get("/", |c| c.string(StatusCode::OK, "welcome to waypoint"))
        .get("/ping", |c| c.json(StatusCode::OK, &json!({ "message": "pong" })))
        .get("/hello/:name", |c| {
            let name = c.param("name").unwrap_or_default().to_string();
            c.string(StatusCode::OK, format!("hello {}", name));
        })
        .get("/assets/*filepath", |c| {
            let filepath = c.param("filepath").unwrap_or_default().to_string();
            c.json(StatusCode::OK, &json!({ "filepath": filepath }));
        })
        .post("/echo", |c| {
            let body = c.body().clone();
            c.data(StatusCode::OK, body);
        });

    if let Some(handle) = metrics {
        engine.get(&config.observability.metrics_path, move |c| {
            c.set_header(header::CONTENT_TYPE.as_str(), "text/plain; version=0.0.4");
            c.data(StatusCode::OK, handle.render());
        });
    }

    let mut api = engine.group(&config.auth.group_prefix);
    if config.auth.enabled {
        api.use_middleware(jwt_auth(JwtConfig {
            secret: config.auth.secret.clone(),
            ttl: Duration::from_secs(config.auth.token_ttl_secs),
        }))
        .use_middleware(rbac(RbacConfig {
            role_permissions: config.auth.role_permissions.clone(),
        }));
    }
    api.get("/public/info", |c| {
        c.json(StatusCode::OK, &json!({ "service": "waypoint" }))
    })
    .get("/secure", |c| {
        let subject = c
            .extensions()
            .get::<Identity>()
            .map(|identity| identity.subject.clone());
        c.json(
            StatusCode::OK,
            &json!({ "message": "secure ok", "subject": subject }),
        );
    });

    let mut v2 = api.group("/v2");
    v2.use_middleware(|c| {
        c.set_header("x-api-version", "2");
        c.next();
    })
    .get("/status", |c| c.json(StatusCode::OK, &json!({ "status": "ok" })));

    engine
}
