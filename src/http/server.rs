//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap an `Engine` in an axum `Router` (single fallback handler)
//! - Wire up layers (request ID, tracing, timeout, body limit)
//! - Run the synchronous engine on the blocking pool
//! - Serve with connect info and graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderName, StatusCode},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::engine::Engine;
use crate::http::request::{buffer_request, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;

/// State injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// HTTP server driving an `Engine`.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Freeze `engine` and build the transport around it.
    pub fn new(engine: Engine, config: ServerConfig) -> Self {
        let state = AppState {
            engine: Arc::new(engine),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuidV4))
    }

    /// The axum router, e.g. for driving requests in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Single entry point: every request goes through the engine.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let request = match buffer_request(request).await {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return response::bad_body();
        }
    };

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let engine = state.engine.clone();

    match tokio::task::spawn_blocking(move || engine.handle(request)).await {
        Ok(engine_response) => response::into_axum(engine_response),
        Err(e) => {
            tracing::error!(method = %method, path = %path, error = %e, "Request handling panicked");
            metrics::record_panic();
            response::internal_error()
        }
    }
}
