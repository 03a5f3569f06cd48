//! Request engine: groups, global middleware and dispatch.
//!
//! # Data Flow
//! ```text
//! Request<Bytes>
//!     → Context::new
//!     → middleware of every group whose prefix matches (creation order)
//!     → global middleware
//!     → resolved route handler, or the built-in not-found handler
//!     → Context::next (runs the chain)
//!     → Response<Bytes>
//! ```
//!
//! # Design Decisions
//! - Groups are a flat list; a request collects middleware from *every*
//!   matching group, so `/api/v2/x` gets both `/api` and `/api/v2` middleware
//! - Not-found is an ordinary chain entry, so middleware observes 404s
//! - No panic containment here; install `middleware::recovery` for that
//! - Registration takes `&mut self`, dispatch takes `&self`: populate first,
//!   then share the engine (e.g. behind an `Arc`) for serving

pub mod context;
pub mod group;

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{Method, Request, Response, StatusCode};
use serde_json::json;

use crate::routing::pattern::has_prefix;
use crate::routing::Router;

pub use context::Context;
pub use group::RouterGroup;

/// Handler or middleware. Middleware forwards by calling `Context::next`.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync + 'static>;

/// Prefix plus its middleware. Nested groups are stored flattened.
struct GroupEntry {
    prefix: String,
    middlewares: Vec<HandlerFunc>,
}

/// HTTP routing and middleware engine.
pub struct Engine {
    router: Router<HandlerFunc>,
    /// Index 0 is the root group with the empty prefix.
    groups: Vec<GroupEntry>,
    middlewares: Vec<HandlerFunc>,
    not_found: HandlerFunc,
}

impl Engine {
    /// Create an engine with only the root group.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            groups: vec![GroupEntry {
                prefix: String::new(),
                middlewares: Vec::new(),
            }],
            middlewares: Vec::new(),
            not_found: Arc::new(not_found),
        }
    }

    /// Create a group under the root.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let index = self.push_group(0, prefix);
        RouterGroup::new(self, index)
    }

    /// Append a group whose prefix is `parent.prefix + prefix`.
    fn push_group(&mut self, parent: usize, prefix: &str) -> usize {
        let prefix = format!("{}{}", self.groups[parent].prefix, prefix);
        self.groups.push(GroupEntry {
            prefix,
            middlewares: Vec::new(),
        });
        self.groups.len() - 1
    }

    fn group_prefix(&self, index: usize) -> &str {
        &self.groups[index].prefix
    }

    fn push_group_middleware(&mut self, index: usize, middleware: HandlerFunc) {
        self.groups[index].middlewares.push(middleware);
    }

    /// Prefixes of all groups in creation order, root first.
    pub fn group_prefixes(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.prefix.as_str()).collect()
    }

    /// Register global middleware, run after all matching group middleware.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Register a handler for `method` and `pattern`.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.register(method, pattern, Arc::new(handler));
        self
    }

    fn register(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        self.router.add_route(method, pattern, handler);
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler)
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler)
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler)
    }

    /// The route index.
    pub fn router(&self) -> &Router<HandlerFunc> {
        &self.router
    }

    /// Assemble the chain for `request`, run it and return the response.
    pub fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let mut context = Context::new(request);

        // 1. Group middleware, cumulative over every matching prefix
        let mut handlers: Vec<HandlerFunc> = self
            .groups
            .iter()
            .filter(|group| has_prefix(context.path(), &group.prefix))
            .flat_map(|group| group.middlewares.iter().cloned())
            .collect();

        // 2. Global middleware
        handlers.extend(self.middlewares.iter().cloned());

        // 3. Route handler or not-found
        match self.router.resolve(context.method(), context.path()) {
            Some(matched) => {
                let handler = self
                    .router
                    .handler(context.method(), matched.pattern)
                    .cloned()
                    .unwrap_or_else(|| self.not_found.clone());
                handlers.push(handler);
                context.set_params(matched.params);
            }
            None => handlers.push(self.not_found.clone()),
        }

        // 4. Run
        context.set_handlers(handlers);
        context.next();
        context.into_response()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in handler for unmatched routes.
fn not_found(c: &mut Context) {
    c.json(StatusCode::NOT_FOUND, &json!({ "error": "not found" }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(path: &str) -> Request<Bytes> {
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    #[test]
    fn test_engine_get() {
        let mut engine = Engine::new();
        engine.get("/hello", |c| c.string(StatusCode::OK, format!("hello {}", "waypoint")));

        let response = engine.handle(get("/hello"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"hello waypoint");
    }

    #[test]
    fn test_engine_not_found() {
        let engine = Engine::new();
        let response = engine.handle(get("/absent"));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "not found");
    }

    #[test]
    fn test_method_mismatch_is_not_found() {
        let mut engine = Engine::new();
        engine.post("/items", |c| c.string(StatusCode::CREATED, "created"));

        assert_eq!(engine.handle(get("/items")).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_params_reach_handler() {
        let mut engine = Engine::new();
        engine.get("/hello/:name", |c| {
            let name = c.param("name").unwrap_or_default().to_string();
            c.string(StatusCode::OK, name);
        });

        assert_eq!(engine.handle(get("/hello/go")).body().as_ref(), b"go");
    }

    #[test]
    fn test_root_group_listed_first() {
        let mut engine = Engine::new();
        engine.group("/api").group("/v2");

        assert_eq!(engine.group_prefixes(), vec!["", "/api", "/api/v2"]);
    }
}
