use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use super::handlers;
use crate::domain::service::ProbeService;

/// `/info` and `/ping`, with per-request tracing.
#[must_use]
pub fn router(service: Arc<ProbeService>) -> Router {
    Router::new()
        .route("/info", get(handlers::get_info))
        .route("/ping", get(handlers::get_ping))
        .layer(Extension(service))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        version = ?req.version(),
                        module = "hello_asset",
                        status = Empty,
                        latency_ms = Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                        tracing::info!(parent: span, "request completed");
                    },
                ),
        )
}
