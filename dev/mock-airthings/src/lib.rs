use axum::{
    Router,
    routing::{get, post},
};
use serde_json::json;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod types;

pub use handlers::{MockState, SharedState};

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/v1/token", post(handlers::token))
        .route(
            "/v1/devices/:id/latest-samples",
            get(handlers::latest_samples),
        )
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

/// Demo reading for a View Plus style device, which reports every sensor.
pub fn view_plus_sample() -> serde_json::Value {
    json!({
        "battery": 100,
        "co2": 612.0,
        "humidity": 41.0,
        "pm1": 3.0,
        "pm25": 4.0,
        "pressure": 1012.4,
        "radonShortTermAvg": 38.0,
        "temp": 21.6,
        "time": 1718000000,
        "voc": 112.0
    })
}

/// Demo reading for a Wave Enhance style device: no radon or particulate sensors.
pub fn wave_enhance_sample() -> serde_json::Value {
    json!({
        "battery": 87,
        "co2": 948.0,
        "humidity": 63.0,
        "pressure": 1011.9,
        "temp": 19.2,
        "time": 1718000000,
        "voc": 240.0
    })
}
