//! HTTP surface: per-integration metrics routers and the host router that
//! dispatches to them.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Request, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use prometheus_client::encoding::text::encode;
use prometheus_client::registry::Registry;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::error::{Result, RuntimeError};
use crate::host::Host;

/// Content type of the OpenMetrics text format.
pub const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Encode a registry in the OpenMetrics text format.
pub fn encode_metrics(registry: &Registry) -> Result<String> {
    let mut body = String::new();
    encode(&mut body, registry).map_err(|e| RuntimeError::Encode(e.to_string()))?;
    Ok(body)
}

/// Router serving a registry at `/metrics`.
pub fn metrics_router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(registry)
}

async fn metrics_handler(State(registry): State<Arc<Registry>>) -> Response {
    match encode_metrics(&registry) {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", OPENMETRICS_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", e)).into_response(),
    }
}

/// Host router: health check and `/api/v0/component/<id>/...` routed to
/// the handler of the component's current generation.
pub fn host_router(host: Arc<Host>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v0/component/:id/*rest", any(component_handler))
        .layer(CorsLayer::permissive())
        .with_state(host)
}

async fn health_handler() -> Response {
    (StatusCode::OK, "healthy\n").into_response()
}

async fn component_handler(
    State(host): State<Arc<Host>>,
    Path((id, rest)): Path<(String, String)>,
    mut request: Request,
) -> Response {
    let Some(component) = host.component(&id) else {
        return (StatusCode::NOT_FOUND, format!("unknown component {}\n", id)).into_response();
    };
    let Some(handler) = component.handler() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("component {} has no running handler\n", id),
        )
            .into_response();
    };

    let path = match request.uri().query() {
        Some(query) => format!("/{}?{}", rest, query),
        None => format!("/{}", rest),
    };
    match path.parse::<Uri>() {
        Ok(uri) => *request.uri_mut() = uri,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    }

    debug!(component = %id, path = %path, "Routing request to component");
    match handler.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}
