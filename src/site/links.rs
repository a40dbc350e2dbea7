//! The `/links` JSON payload.

use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::config::LinkEntry;

/// Wire shape: `{"url_arr":[{"name":..,"url":..}, ...]}`.
#[derive(Debug, Serialize)]
pub struct LinksPayload<'a> {
    pub url_arr: &'a [LinkEntry],
}

/// Serve the configured links, in configured order.
pub fn links_response(links: &[LinkEntry]) -> Response {
    Json(LinksPayload { url_arr: links }).into_response()
}
