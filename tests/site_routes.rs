//! End-to-end tests against a running server and a mock template upstream.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hyper::ext::ReasonPhrase;
use tower::ServiceExt;

use links_edge::config::LinkEntry;
use links_edge::HttpServer;

mod common;

#[tokio::test]
async fn test_links_returns_configured_entries_in_order() {
    let upstream = common::closed_port().await;
    let site = common::spawn_site(common::config_for(upstream)).await;

    let res = common::client().get(site.url("/links")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(res.headers().contains_key("x-request-id"));

    let body: serde_json::Value = res.json().await.unwrap();
    let names: Vec<&str> = body["url_arr"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["Rutgers University", "University of Michigan", "Georgia Tech."]
    );
}

#[tokio::test]
async fn test_unknown_route_is_plain_not_found() {
    let upstream = common::closed_port().await;
    let site = common::spawn_site(common::config_for(upstream)).await;
    let client = common::client();

    for (method, path) in [("GET", "/unknown"), ("POST", "/links"), ("POST", "/")] {
        let res = client
            .request(method.parse().unwrap(), site.url(path))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 404, "{} {}", method, path);
        assert_eq!(res.headers()["content-type"], "text/plain");
        assert_eq!(res.text().await.unwrap(), "resource not found");
    }
}

#[tokio::test]
async fn test_root_serves_rewritten_template() {
    let upstream = common::start_mock_upstream(common::TEMPLATE).await;
    let site = common::spawn_site(common::config_for(upstream)).await;

    let res = common::client().get(site.url("/")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/html");
    assert_eq!(res.headers()["set-cookie"], "SameSite=None");

    let html = res.text().await.unwrap();
    assert!(html.contains(r#"<h1 id="name">Himesh Buch (buchhimesh@gmail.com)</h1>"#));
    assert!(html.contains("<title>Himesh Buch</title>"));
    assert!(html.contains(r#"style="background:#b5651d""#));
    assert!(html.contains(r#"<div id="profile" style="display:visible">"#));
    assert!(html.contains(r#"<a href="https://umich.edu/">University of Michigan</a>"#));
    assert!(html.contains(r#"<a href="https://www.linkedin.com/in/himesh-buch-003b98154"><svg"#));
    // Untouched markup survives as-is
    assert!(html.contains(r#"<img id="avatar" src="/avatar.png" />"#));
    assert!(html.starts_with("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_upstream_down_is_bad_gateway() {
    let upstream = common::closed_port().await;
    let site = common::spawn_site(common::config_for(upstream)).await;

    let res = common::client().get(site.url("/")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY.as_u16());
    assert_eq!(res.headers()["content-type"], "text/plain");
}

#[tokio::test]
async fn test_upstream_error_status_is_bad_gateway() {
    let upstream = common::start_programmable_upstream(|| async {
        (503, "maintenance".to_string())
    })
    .await;
    let site = common::spawn_site(common::config_for(upstream)).await;

    let res = common::client().get(site.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY.as_u16());
}

#[tokio::test]
async fn test_slow_upstream_is_gateway_timeout() {
    let upstream = common::start_programmable_upstream(|| async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        (200, common::TEMPLATE.to_string())
    })
    .await;
    let mut config = common::config_for(upstream);
    config.upstream.request_timeout_secs = 1;
    let site = common::spawn_site(config).await;

    let res = common::client().get(site.url("/")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT.as_u16());
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert_eq!(res.text().await.unwrap(), "upstream timed out");
}

#[tokio::test]
async fn test_reload_swaps_site_and_rejects_broken_config() {
    let upstream = common::closed_port().await;
    let config = common::config_for(upstream);
    let site = common::spawn_site(config.clone()).await;
    let client = common::client();

    let mut updated = config.clone();
    updated.profile.links = vec![LinkEntry::new("Only", "https://only.test/")];
    site.config_updates.send(updated).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let body: serde_json::Value = client
        .get(site.url("/links"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        serde_json::json!({"url_arr": [{"name": "Only", "url": "https://only.test/"}]})
    );

    let mut broken = config;
    broken.upstream.template_url = "not a url".into();
    site.config_updates.send(broken).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let body: serde_json::Value = client
        .get(site.url("/links"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["url_arr"][0]["name"], "Only");
}

#[tokio::test]
async fn test_not_found_carries_reason_phrase() {
    let upstream = common::closed_port().await;
    let server = HttpServer::new(common::config_for(upstream)).unwrap();

    let response = server
        .router()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.extensions().get::<ReasonPhrase>().unwrap().as_bytes(),
        b"not found"
    );
}
