//! Site assembly.
//!
//! # Data Flow
//! ```text
//! SiteConfig
//!     → Site::from_config (compile paths, build profile pipeline, upstream client)
//!     → Arc<Site> shared by every request until the next reload
//!
//! Per request:
//!     Site::router → fresh Router (4 routes) → route(request)
//! ```
//!
//! # Route Table
//! 1. `GET /links` → JSON link list
//! 2. `GET /links` → raw passthrough to the upstream host (shadowed by 1)
//! 3. `GET /`      → rewritten profile page
//! 4. `GET ""`     → rewritten profile page (request paths are never empty)

pub mod links;
pub mod profile;

use std::sync::Arc;

use thiserror::Error;

use crate::config::{LinkEntry, ProfileConfig, SiteConfig};
use crate::error::AppError;
use crate::rewrite::{RewriteError, TransformPipeline};
use crate::routing::{PathMatcher, Router, RoutingError};
use crate::upstream::{UpstreamClient, UpstreamError};

pub const LINKS_PATH: &str = "/links";
pub const ROOT_PATH: &str = "/";

/// Errors building a site from configuration.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Everything a request needs, compiled once per configuration.
#[derive(Debug)]
pub struct Site {
    profile: ProfileConfig,
    links_path: PathMatcher,
    root_path: PathMatcher,
    empty_path: PathMatcher,
    pipeline: TransformPipeline,
    upstream: UpstreamClient,
}

impl Site {
    pub fn from_config(config: &SiteConfig) -> Result<Self, SiteError> {
        let site = Self {
            profile: config.profile.clone(),
            links_path: PathMatcher::new(LINKS_PATH)?,
            root_path: PathMatcher::new(ROOT_PATH)?,
            empty_path: PathMatcher::new("")?,
            pipeline: profile::profile_pipeline(&config.profile)?,
            upstream: UpstreamClient::new(&config.upstream)?,
        };

        tracing::warn!(
            path = LINKS_PATH,
            "Passthrough route for this path is registered after the JSON route and is never served"
        );
        tracing::info!(
            template_url = %site.upstream.template_url(),
            links = site.profile.links.len(),
            bindings = site.pipeline.len(),
            "Site compiled"
        );
        Ok(site)
    }

    pub fn links(&self) -> &[LinkEntry] {
        &self.profile.links
    }

    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// Build the route table for one request.
    pub fn router(self: &Arc<Self>) -> Router<AppError> {
        let links_site = Arc::clone(self);
        let passthrough_site = Arc::clone(self);
        let root_site = Arc::clone(self);
        let empty_site = Arc::clone(self);

        Router::<AppError>::new()
            .get(self.links_path.clone(), move |_req| {
                let site = Arc::clone(&links_site);
                async move { Ok::<_, AppError>(links::links_response(site.links())) }
            })
            // Same path as above: first match wins, so this never runs. Kept
            // registered so the table matches what is deployed.
            .get(self.links_path.clone(), move |req| {
                let site = Arc::clone(&passthrough_site);
                async move { site.upstream().forward(req).await.map_err(AppError::from) }
            })
            .get(self.root_path.clone(), move |_req| {
                profile::render(Arc::clone(&root_site))
            })
            .get(self.empty_path.clone(), move |_req| {
                profile::render(Arc::clone(&empty_site))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};

    fn site() -> Arc<Site> {
        let mut config = SiteConfig::default();
        // Never contacted by these tests
        config.upstream.template_url = "http://127.0.0.1:9/".into();
        Arc::new(Site::from_config(&config).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_route_table_keeps_shadowed_registrations() {
        assert_eq!(site().router().len(), 4);
    }

    #[tokio::test]
    async fn test_links_served_as_json_not_proxied() {
        let site = site();
        let router = site.router();

        for _ in 0..3 {
            let response = router.route(get("/links")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(
                json,
                serde_json::json!({
                    "url_arr": [
                        {"name": "Rutgers University", "url": "https://www.rutgers.edu/"},
                        {"name": "University of Michigan", "url": "https://umich.edu/"},
                        {"name": "Georgia Tech.", "url": "https://www.gatech.edu/"},
                    ]
                })
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_paths_fall_through_to_not_found() {
        let router = site().router();

        for uri in ["/unknown", "/links/", "/index.html"] {
            let response = router.route(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let post = Request::builder()
            .method("POST")
            .uri("/links")
            .body(Body::empty())
            .unwrap();
        let response = router.route(post).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_resolves_to_profile_route() {
        let site = site();
        let router = site.router();
        assert!(router.resolve(&get("/")).is_some());
    }
}
