//! Sliding-window rate limiting middleware.
//!
//! # Responsibilities
//! - Track request timestamps per client key
//! - Reject with 429 once a client has `limit` requests inside the window
//! - Purge idle clients in a background task
//!
//! # Design Decisions
//! - Key: first `X-Forwarded-For` entry, else peer IP, else "unknown"
//! - Rejected requests are not recorded
//! - Per-key locking via DashMap; no global lock on the request path

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::ConnectInfo;
use axum::http::StatusCode;
use dashmap::DashMap;
use serde_json::json;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::engine::Context;
use crate::observability::metrics;

/// In-memory sliding-window limiter.
#[derive(Debug)]
pub struct RateLimiter {
    clients: DashMap<String, Vec<Instant>>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    /// Allow at most `limit` requests per client within `window`.
    pub fn new(window: Duration, limit: usize) -> Self {
        Self {
            clients: DashMap::new(),
            limit,
            window,
        }
    }

    /// Record a request for `key` if it is within the limit.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut requests = self.clients.entry(key.to_string()).or_default();
        requests.retain(|ts| now.saturating_duration_since(*ts) < self.window);

        if requests.len() >= self.limit {
            return false;
        }
        requests.push(now);
        true
    }

    /// Drop expired timestamps and forget clients with none left.
    pub fn purge_expired(&self) {
        self.purge_at(Instant::now());
    }

    fn purge_at(&self, now: Instant) {
        self.clients.retain(|_, requests| {
            requests.retain(|ts| now.saturating_duration_since(*ts) < self.window);
            !requests.is_empty()
        });
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    /// Build the middleware sharing this limiter.
    pub fn middleware(self: &Arc<Self>) -> impl Fn(&mut Context) + Send + Sync + 'static {
        let limiter = Arc::clone(self);
        move |c: &mut Context| {
            let key = client_key(c);
            if limiter.allow(&key) {
                c.next();
            } else {
                tracing::warn!(client = %key, path = %c.path(), "Rate limit exceeded");
                metrics::record_rate_limited();
                c.json(
                    StatusCode::TOO_MANY_REQUESTS,
                    &json!({ "error": "too many requests" }),
                );
            }
        }
    }

    /// Purge idle clients every `interval` until shutdown.
    pub fn spawn_cleanup(
        self: Arc<Self>,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.purge_expired();
                        tracing::trace!(clients = self.tracked_clients(), "Rate limiter purged");
                    }
                    _ = shutdown.recv() => {
                        tracing::debug!("Rate limiter cleanup stopped");
                        break;
                    }
                }
            }
        })
    }
}

/// Client identity used as the limiter key.
fn client_key(c: &Context) -> String {
    if let Some(forwarded) = c.header("x-forwarded-for").filter(|v| !v.is_empty()) {
        if let Some(first) = forwarded.split(',').next() {
            return first.trim().to_string();
        }
    }
    c.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use axum::body::Bytes;
    use axum::http::Request;

    fn get(forwarded_for: Option<&str>) -> Request<Bytes> {
        let mut builder = Request::builder().uri("/ping");
        if let Some(value) = forwarded_for {
            builder = builder.header("X-Forwarded-For", value);
        }
        builder.body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(Duration::from_millis(200), 2);
        let start = Instant::now();

        assert!(limiter.allow_at("a", start));
        assert!(limiter.allow_at("a", start + Duration::from_millis(10)));
        assert!(!limiter.allow_at("a", start + Duration::from_millis(20)));
        assert!(limiter.allow_at("b", start + Duration::from_millis(20)));
        assert!(limiter.allow_at("a", start + Duration::from_millis(250)));
    }

    #[test]
    fn test_rejections_are_not_recorded() {
        let limiter = RateLimiter::new(Duration::from_millis(100), 1);
        let start = Instant::now();

        assert!(limiter.allow_at("a", start));
        for ms in [10, 20, 30] {
            assert!(!limiter.allow_at("a", start + Duration::from_millis(ms)));
        }
        assert!(limiter.allow_at("a", start + Duration::from_millis(101)));
    }

    #[test]
    fn test_purge_forgets_idle_clients() {
        let limiter = RateLimiter::new(Duration::from_millis(100), 5);
        let start = Instant::now();
        limiter.allow_at("a", start);
        limiter.allow_at("b", start + Duration::from_millis(80));

        limiter.purge_at(start + Duration::from_millis(150));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_middleware_limits_per_client() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 2));
        let mut engine = Engine::new();
        engine
            .use_middleware(limiter.middleware())
            .get("/ping", |c| c.string(StatusCode::OK, "pong"));

        assert_eq!(engine.handle(get(None)).status(), StatusCode::OK);
        assert_eq!(engine.handle(get(None)).status(), StatusCode::OK);
        let response = engine.handle(get(None));
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.body().as_ref(), br#"{"error":"too many requests"}"#);

        let other = engine.handle(get(Some("10.0.0.9, 192.168.1.1")));
        assert_eq!(other.status(), StatusCode::OK);
        assert!(limiter.clients.contains_key("10.0.0.9"));
        assert!(limiter.clients.contains_key("unknown"));
    }

    #[test]
    fn test_limited_request_never_reaches_handler() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 1));
        let mut engine = Engine::new();
        engine
            .use_middleware(limiter.middleware())
            .get("/ping", move |c| {
                counter.fetch_add(1, Ordering::SeqCst);
                c.string(StatusCode::OK, "pong");
            });

        for _ in 0..3 {
            engine.handle(get(None));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_key_from_connect_info() {
        let mut request = get(None);
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        let c = Context::new(request);
        assert_eq!(client_key(&c), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_cleanup_stops_on_shutdown() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(10), 5));
        limiter.allow("a");
        let (tx, rx) = broadcast::channel(1);

        let handle = limiter.clone().spawn_cleanup(Duration::from_millis(20), rx);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(limiter.tracked_clients(), 0);

        tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
