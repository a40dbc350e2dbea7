//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (case-insensitive)
//! - Match header values (exact)
//! - Match the full request path against a regex
//!
//! # Design Decisions
//! - Matchers are pure: no side effects, no interior state
//! - Path patterns are compiled once, when the matcher is built
//! - A path matches only when the leftmost regex match spans the whole path

use axum::body::Body;
use axum::http::Request;
use regex::Regex;

use crate::routing::RoutingError;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the request method, ignoring ASCII case.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: String,
}

impl MethodMatcher {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
        }
    }

    pub fn get() -> Self {
        Self::new("get")
    }

    pub fn post() -> Self {
        Self::new("post")
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.method().as_str().eq_ignore_ascii_case(&self.method)
    }
}

/// Matches a header against an exact value.
///
/// A missing header, or one that is not valid UTF-8, never matches.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    name: String,
    value: String,
}

impl HeaderMatcher {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Matches the `host` header.
    /// The expected host is lowercased; the request value is compared as sent.
    pub fn host(host: &str) -> Self {
        Self::new("host", host.to_lowercase())
    }

    /// Matches the `referrer` header, lowercased like [`HeaderMatcher::host`].
    pub fn referrer(host: &str) -> Self {
        Self::new("referrer", host.to_lowercase())
    }
}

impl Matcher for HeaderMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.headers()
            .get(self.name.as_str())
            .and_then(|v| v.to_str().ok())
            .map(|v| v == self.value)
            .unwrap_or(false)
    }
}

/// Matches the request path against a regular expression.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: Regex,
}

impl PathMatcher {
    /// Compile a path pattern.
    pub fn new(pattern: &str) -> Result<Self, RoutingError> {
        let pattern = Regex::new(pattern).map_err(|source| RoutingError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    fn matches_path(&self, path: &str) -> bool {
        self.pattern
            .find(path)
            .map(|m| m.start() == 0 && m.end() == path.len())
            .unwrap_or(false)
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        // An absolute URL always has at least the root path
        let path = match req.uri().path() {
            "" => "/",
            path => path,
        };
        self.matches_path(path)
    }
}
