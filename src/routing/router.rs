//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Look up the first route whose conditions all hold
//! - Invoke its handler, or answer with the fixed not-found response
//!
//! # Design Decisions
//! - Registration order is load-bearing: first match wins, always
//! - An empty condition list matches every request
//! - Handler errors are returned to the caller untouched

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::{BoxFuture, FutureExt};
use hyper::ext::ReasonPhrase;

use crate::routing::matcher::{Matcher, MethodMatcher, PathMatcher};

type BoxHandler<E> =
    Box<dyn Fn(Request<Body>) -> BoxFuture<'static, Result<Response, E>> + Send + Sync>;

/// A set of conditions paired with the handler that serves them.
pub struct Route<E> {
    conditions: Vec<Arc<dyn Matcher>>,
    handler: BoxHandler<E>,
}

impl<E> Route<E> {
    /// Returns true if every condition holds for the request.
    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.conditions.iter().all(|c| c.matches(req))
    }

    /// Invoke the handler.
    pub fn call(&self, req: Request<Body>) -> BoxFuture<'static, Result<Response, E>> {
        (self.handler)(req)
    }
}

impl<E> std::fmt::Debug for Route<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("conditions", &self.conditions)
            .finish_non_exhaustive()
    }
}

/// Ordered route registry.
///
/// Built fresh for each request and dropped with it.
pub struct Router<E> {
    routes: Vec<Route<E>>,
}

impl<E: Send + 'static> Router<E> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route. An empty `conditions` list matches every request.
    pub fn handle<F, Fut>(mut self, conditions: Vec<Arc<dyn Matcher>>, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        self.routes.push(Route {
            conditions,
            handler: Box::new(move |req| handler(req).boxed()),
        });
        self
    }

    pub fn get<F, Fut>(self, path: PathMatcher, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        let conditions: Vec<Arc<dyn Matcher>> =
            vec![Arc::new(MethodMatcher::get()), Arc::new(path)];
        self.handle(conditions, handler)
    }

    pub fn post<F, Fut>(self, path: PathMatcher, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        let conditions: Vec<Arc<dyn Matcher>> =
            vec![Arc::new(MethodMatcher::post()), Arc::new(path)];
        self.handle(conditions, handler)
    }

    /// Register a catch-all route.
    pub fn all<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        self.handle(Vec::new(), handler)
    }

    /// Find the first registered route matching the request.
    pub fn resolve(&self, req: &Request<Body>) -> Option<&Route<E>> {
        self.routes.iter().find(|route| route.matches(req))
    }

    /// Dispatch the request to the first matching route.
    ///
    /// Falls back to [`not_found`] when nothing matches. Errors returned by
    /// the handler are passed through to the caller.
    pub async fn route(&self, req: Request<Body>) -> Result<Response, E> {
        match self.resolve(&req) {
            Some(route) => route.call(req).await,
            None => Ok(not_found()),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<E: Send + 'static> Default for Router<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed response for requests no route accepts.
pub fn not_found() -> Response {
    let mut response = (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "resource not found",
    )
        .into_response();
    response
        .extensions_mut()
        .insert(ReasonPhrase::from_static(b"not found"));
    response
}
