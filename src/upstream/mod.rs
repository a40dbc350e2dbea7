//! Upstream template service.
//!
//! # Responsibilities
//! - Fetch the HTML template (head awaited, body streamed)
//! - Relay raw passthrough requests to the upstream host
//! - Classify failures so callers can answer 502 or 504
//!
//! # Design Decisions
//! - One attempt per request; no retries
//! - Connect and total timeouts come from config
//! - A non-success upstream status is a failure, not content

pub mod client;

pub use client::UpstreamClient;

use axum::http::StatusCode;
use thiserror::Error;

/// Errors talking to the upstream service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("upstream request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error("failed to build response: {0}")]
    Response(#[source] axum::http::Error),
}

impl UpstreamError {
    /// Classify a failed request.
    pub fn from_request(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout(e)
        } else {
            UpstreamError::Connection(e)
        }
    }

    /// Status code reported to the client for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpstreamError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            UpstreamError::Connection(_) | UpstreamError::Status(_) => StatusCode::BAD_GATEWAY,
            UpstreamError::InvalidUrl { .. }
            | UpstreamError::Client(_)
            | UpstreamError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
