//! Metrics collection and exposition.
//!
//! # Metrics
//! - `links_edge_requests_total` (counter): requests by method, status
//! - `links_edge_request_duration_seconds` (histogram): time to response head
//! - `links_edge_upstream_fetches_total` (counter): template fetches by outcome
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`init_metrics`] installs the Prometheus exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "links_edge_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("links_edge_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_fetch(outcome: &'static str) {
    metrics::counter!("links_edge_upstream_fetches_total", "outcome" => outcome).increment(1);
}
