//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, headers)
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: handler response, or the fixed 404
//!
//! Route Registration (per request):
//!     handle / get / post / all
//!     → Append route (conditions + handler)
//!     → Router is dropped with the request
//! ```
//!
//! # Design Decisions
//! - Path patterns compiled once at setup, shared across routers
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod matcher;
pub mod router;

pub use matcher::{HeaderMatcher, Matcher, MethodMatcher, PathMatcher};
pub use router::{not_found, Route, Router};

use thiserror::Error;

/// Errors raised while building routes.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A path pattern is not a valid regular expression.
    #[error("invalid path pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
