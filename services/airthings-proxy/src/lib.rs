use axum::http::{HeaderValue, header};
use axum::{
    Router,
    routing::{any, get},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub mod airthings;
pub mod config;
pub mod error;
pub mod handlers;
pub mod rating;
pub mod report;

use crate::airthings::AirthingsClient;

pub struct AppState {
    pub airthings: AirthingsClient,
}

impl AppState {
    pub fn new(airthings: AirthingsClient) -> Self {
        Self { airthings }
    }
}

pub type SharedState = Arc<AppState>;

/// Dashboard routes. Method checks happen in the handlers so that every
/// response, 405 included, carries the CORS headers.
fn dashboard_routes() -> Router<SharedState> {
    Router::new()
        .route("/airthings", any(handlers::single_device))
        .route("/airthings-dual", any(handlers::dual_device))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .merge(dashboard_routes())
        .route(
            "/healthz",
            get(|| async { axum::Json(json!({"status": "ok"})) }),
        )
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let request_id = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    %request_id,
                    method = %req.method(),
                    uri = %req.uri(),
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
