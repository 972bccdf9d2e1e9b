//! Integration tests for the component host.
//!
//! These tests verify the full flow from building a component to serving
//! its metrics through the host router, across reloads.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use flowconv_runtime::Host;

const SELF_ID: &str = "prometheus.exporter.self.agent";

/// Helper to GET a path through the host router.
async fn get(router: &Router, path: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Helper to poll the component's metrics until `predicate` holds.
async fn wait_for_metrics(router: &Router, predicate: impl Fn(&str) -> bool) -> String {
    let path = format!("/api/v0/component/{}/metrics", SELF_ID);
    for _ in 0..200 {
        let (status, body) = get(router, &path).await;
        if status == StatusCode::OK && predicate(&body) {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("metrics never matched");
}

#[tokio::test]
async fn test_not_ready_before_run() {
    let host = Arc::new(Host::with_builtin("127.0.0.1:12345"));
    host.build("prometheus.exporter.self", "agent", json!({}))
        .unwrap();

    let (status, _) = get(
        &host.router(),
        &format!("/api/v0/component/{}/metrics", SELF_ID),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_reload_through_host() {
    let host = Arc::new(Host::with_builtin("127.0.0.1:12345"));
    let component = host
        .build("prometheus.exporter.self", "agent", json!({}))
        .unwrap();
    let router = host.router();

    let cancel = CancellationToken::new();
    let tasks = host.spawn_components(&cancel);

    let body = wait_for_metrics(&router, |b| b.contains("agent_build_info")).await;
    assert!(body.contains("agent_uptime_seconds"));

    component
        .update(json!({ "namespace": "edge", "const_labels": { "site": "paris" } }))
        .unwrap();
    let body = wait_for_metrics(&router, |b| b.contains("edge_build_info")).await;
    assert!(body.contains("site=\"paris\""));

    // Invalid arguments leave the running generation in place.
    assert!(component.update(json!({ "namespace": "no-dashes" })).is_err());
    let (status, body) = get(&router, &format!("/api/v0/component/{}/metrics", SELF_ID)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("edge_build_info"));

    let exports = host.exports(SELF_ID).unwrap();
    assert_eq!(
        exports["targets"][0]["__metrics_path__"],
        format!("/api/v0/component/{}/metrics", SELF_ID)
    );

    cancel.cancel();
    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test]
async fn test_serve_stops_on_cancel() {
    let host = Arc::new(Host::with_builtin("127.0.0.1:0"));
    host.build("prometheus.exporter.self", "agent", json!({}))
        .unwrap();

    let cancel = CancellationToken::new();
    let server = tokio::spawn(host.clone().serve("127.0.0.1:0".parse().unwrap(), cancel.clone()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server stopped")
        .unwrap();
    assert!(result.is_ok());
}
