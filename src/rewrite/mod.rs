//! Streaming HTML transformation.
//!
//! # Data Flow
//! ```text
//! upstream body (chunked)
//!     → pipeline.rs (selector → mutator bindings, one rewriter per document)
//!     → mutator.rs (edit each matched element)
//!     → rewritten chunks, produced as the client reads them
//! ```
//!
//! # Design Decisions
//! - Bindings apply in registration order, per matched element
//! - Unmatched content passes through byte-for-byte
//! - A selector that matches nothing is a no-op, not an error
//! - Invalid selectors are rejected when the pipeline is built

pub mod mutator;
pub mod pipeline;

pub use mutator::Mutator;
pub use pipeline::{RewriteStream, TransformPipeline};

use thiserror::Error;

/// Errors raised while building or running a transformation.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("html rewriting failed: {0}")]
    Rewrite(String),

    #[error("source stream failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}
