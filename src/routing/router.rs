//! Route index: one trie per method plus the handler table.
//!
//! # Responsibilities
//! - Register (method, pattern, handler)
//! - Resolve (method, path) into the matched pattern and its params
//! - Look up the handler stored for (method, pattern)
//!
//! # Design Decisions
//! - Trie and handler table live in one per-method entry so they are
//!   always updated together
//! - Generic over the handler type; the engine stores `HandlerFunc`
//! - Re-registering a pattern replaces its handler and leaves the trie as is

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::pattern::parse_pattern;
use crate::routing::trie::Node;

/// Trie root and handlers registered for one method.
#[derive(Debug)]
struct MethodRoutes<H> {
    root: Node,
    handlers: HashMap<String, H>,
}

impl<H> Default for MethodRoutes<H> {
    fn default() -> Self {
        Self {
            root: Node::new(),
            handlers: HashMap::new(),
        }
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'r> {
    /// The registered pattern that matched, e.g. `/hello/:name`.
    pub pattern: &'r str,
    /// Captured `:name` and `*name` values.
    pub params: HashMap<String, String>,
}

/// Per-method route index.
#[derive(Debug)]
pub struct Router<H> {
    routes: HashMap<Method, MethodRoutes<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `pattern`.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: H) {
        let parts = parse_pattern(pattern);
        let entry = self.routes.entry(method).or_default();
        entry.root.insert(pattern, &parts, 0);
        entry.handlers.insert(pattern.to_string(), handler);
    }

    /// Resolve a request path.
    ///
    /// Returns `None` when the method has no routes or no terminal node
    /// matches.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let entry = self.routes.get(method)?;
        let search_parts = parse_pattern(path);
        let node = entry.root.search(&search_parts, 0)?;

        let mut params = HashMap::new();
        for (index, part) in parse_pattern(node.pattern()).into_iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if let Some(value) = search_parts.get(index) {
                    params.insert(name.to_string(), (*value).to_string());
                }
            }
            if let Some(name) = part.strip_prefix('*') {
                if !name.is_empty() {
                    let rest = search_parts.get(index..).unwrap_or_default();
                    params.insert(name.to_string(), rest.join("/"));
                }
                break;
            }
        }

        Some(RouteMatch {
            pattern: node.pattern(),
            params,
        })
    }

    /// Handler stored for an exact registered pattern.
    pub fn handler(&self, method: &Method, pattern: &str) -> Option<&H> {
        self.routes.get(method)?.handlers.get(pattern)
    }

    /// Trie root for a method, if any route was registered under it.
    pub fn root(&self, method: &Method) -> Option<&Node> {
        self.routes.get(method).map(|entry| &entry.root)
    }

    /// Registered `(method, pattern)` pairs, sorted for stable output.
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut routes: Vec<(Method, String)> = self
            .routes
            .iter()
            .flat_map(|(method, entry)| {
                entry
                    .handlers
                    .keys()
                    .map(move |pattern| (method.clone(), pattern.clone()))
            })
            .collect();
        routes.sort_by(|a, b| (a.0.as_str(), &a.1).cmp(&(b.0.as_str(), &b.1)));
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_params() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/hello/:name", "hello");

        let matched = router.resolve(&Method::GET, "/hello/go").unwrap();
        assert_eq!(matched.pattern, "/hello/:name");
        assert_eq!(matched.params.get("name").map(String::as_str), Some("go"));
        assert_eq!(router.handler(&Method::GET, matched.pattern), Some(&"hello"));
    }

    #[test]
    fn test_wildcard_route() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/assets/*filepath", ());

        let matched = router.resolve(&Method::GET, "/assets/img/logo.png").unwrap();
        assert_eq!(matched.pattern, "/assets/*filepath");
        assert_eq!(
            matched.params.get("filepath").map(String::as_str),
            Some("img/logo.png")
        );
    }

    #[test]
    fn test_bare_star_captures_nothing() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/files/*", ());

        let matched = router.resolve(&Method::GET, "/files/a/b").unwrap();
        assert!(matched.params.is_empty());
    }

    #[test]
    fn test_mixed_params() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/repos/:owner/:repo/blob/*path", ());

        let matched = router
            .resolve(&Method::GET, "/repos/rust-lang/rust/blob/src/lib.rs")
            .unwrap();
        assert_eq!(matched.params["owner"], "rust-lang");
        assert_eq!(matched.params["repo"], "rust");
        assert_eq!(matched.params["path"], "src/lib.rs");
    }

    #[test]
    fn test_unknown_method_or_path() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/ping", ());

        assert!(router.resolve(&Method::POST, "/ping").is_none());
        assert!(router.resolve(&Method::GET, "/pong").is_none());
        assert!(router.root(&Method::POST).is_none());
    }

    #[test]
    fn test_reregister_replaces_handler() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/a/:id", 1);
        router.add_route(Method::GET, "/b", 2);
        let nodes = router.root(&Method::GET).unwrap().len();

        router.add_route(Method::GET, "/a/:id", 3);

        assert_eq!(router.root(&Method::GET).unwrap().len(), nodes);
        assert_eq!(router.handler(&Method::GET, "/a/:id"), Some(&3));
        assert_eq!(router.resolve(&Method::GET, "/b").unwrap().pattern, "/b");
        assert_eq!(router.routes().len(), 2);
    }

    #[test]
    fn test_path_normalisation() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/a/b", ());

        assert_eq!(router.resolve(&Method::GET, "/a//b/").unwrap().pattern, "/a/b");
    }
}
