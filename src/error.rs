//! Errors surfaced by request handlers.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::rewrite::RewriteError;
use crate::upstream::UpstreamError;

/// Failure while serving a routed request.
///
/// The router hands these back untouched; the HTTP entry point turns them
/// into responses through [`IntoResponse`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upstream(e) => e.status_code(),
            AppError::Rewrite(_) | AppError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(status = %status, error = %self, "Request failed");

        let message = match status {
            StatusCode::BAD_GATEWAY => "upstream unavailable",
            StatusCode::GATEWAY_TIMEOUT => "upstream timed out",
            _ => "internal error",
        };
        (status, [(header::CONTENT_TYPE, "text/plain")], message).into_response()
    }
}
