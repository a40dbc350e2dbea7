//! HTTP client for the template service.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use bytes::Bytes;
use futures_util::stream::Stream;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

/// Client bound to one upstream template URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    template_url: Url,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let template_url =
            Url::parse(&config.template_url).map_err(|source| UpstreamError::InvalidUrl {
                url: config.template_url.clone(),
                source,
            })?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("links-edge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            client,
            template_url,
        })
    }

    pub fn template_url(&self) -> &Url {
        &self.template_url
    }

    /// Fetch the template and hand back its body as a byte stream.
    ///
    /// Only the response head is awaited here; the body streams afterwards.
    pub async fn fetch_template(
        &self,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static, UpstreamError> {
        tracing::debug!(url = %self.template_url, "Fetching template");

        let response = self
            .client
            .get(self.template_url.clone())
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream_fetch("error");
                UpstreamError::from_request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::record_upstream_fetch("bad_status");
            return Err(UpstreamError::Status(status));
        }

        metrics::record_upstream_fetch("ok");
        Ok(response.bytes_stream())
    }

    /// Relay a request to the upstream host unchanged.
    ///
    /// The request's path and query are resolved against the template URL;
    /// status, content type and body come back as the upstream sent them.
    pub async fn forward(&self, req: Request<Body>) -> Result<Response, UpstreamError> {
        let target = match req.uri().path_and_query() {
            Some(pq) => self.template_url.join(pq.as_str()),
            None => Ok(self.template_url.clone()),
        }
        .map_err(|source| UpstreamError::InvalidUrl {
            url: req.uri().to_string(),
            source,
        })?;

        tracing::debug!(url = %target, "Forwarding request upstream");

        let upstream = self
            .client
            .request(req.method().clone(), target)
            .send()
            .await
            .map_err(UpstreamError::from_request)?;

        let mut builder = Response::builder().status(upstream.status());
        if let Some(content_type) = upstream.headers().get(header::CONTENT_TYPE) {
            builder = builder.header(header::CONTENT_TYPE, content_type.clone());
        }

        builder
            .body(Body::from_stream(upstream.bytes_stream()))
            .map_err(UpstreamError::Response)
    }
}
