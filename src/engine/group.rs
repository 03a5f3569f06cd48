//! Route groups.
//!
//! A group is a prefix plus middleware. Creating a sub-group concatenates
//! prefixes and appends the result to the engine's flat group list; nothing
//! is nested structurally. A `RouterGroup` is a handle borrowing the engine
//! mutably for as long as registration on it continues.

use std::sync::Arc;

use axum::http::Method;

use crate::engine::{Context, Engine};

/// Registration handle for one group.
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    index: usize,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, index: usize) -> Self {
        Self { engine, index }
    }

    /// Effective prefix of this group.
    pub fn prefix(&self) -> &str {
        self.engine.group_prefix(self.index)
    }

    /// Create a sub-group with prefix `self.prefix() + prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let index = self.engine.push_group(self.index, prefix);
        RouterGroup::new(&mut *self.engine, index)
    }

    /// Append middleware to this group.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.engine
            .push_group_middleware(self.index, Arc::new(middleware));
        self
    }

    /// Register `prefix + pattern` for `method`.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        let pattern = format!("{}{}", self.prefix(), pattern);
        self.engine.register(method, &pattern, Arc::new(handler));
        self
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
}
