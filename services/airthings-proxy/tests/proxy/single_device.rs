use crate::support::*;
use axum::{
    Router,
    http::{Method, StatusCode},
    routing::{get, post},
};
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
#[serial_test::serial]
async fn preflight_needs_no_configuration() {
    clear_credentials();
    let (upstream, hits) = serve_counter().await;
    let reply = call(proxy(&upstream.endpoints), Method::OPTIONS, "/airthings").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.is_empty());
    assert_cors(&reply.headers);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[serial_test::serial]
async fn other_methods_are_rejected_before_any_upstream_call() {
    set_credentials(CLIENT_SECRET, Some(OFFICE), None);
    let (upstream, hits) = serve_counter().await;
    for method in [
        Method::HEAD,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
    ] {
        let reply = call(proxy(&upstream.endpoints), method.clone(), "/airthings").await;
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        if method != Method::HEAD {
            assert_eq!(reply.json(), json!({"error": "Method not allowed"}));
        }
        assert_cors(&reply.headers);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[serial_test::serial]
async fn get_returns_rated_fields() {
    set_credentials(CLIENT_SECRET, Some(OFFICE), None);
    let upstream = serve_vendor(&[(
        OFFICE,
        json!({
            "humidity": 28,
            "co2": 1001,
            "radonShortTermAvg": 150,
            "voc": 100,
            "temp": 22.5,
            "time": 1718000000
        }),
    )])
    .await;

    let reply = call(proxy(&upstream.endpoints), Method::GET, "/airthings").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_cors(&reply.headers);

    let v = reply.json();
    assert_eq!(v["humidity"], json!({"level": 28, "rating": "Fair"}));
    assert_eq!(v["co2"], json!({"level": 1001, "rating": "Poor"}));
    assert_eq!(v["radon"], json!({"level": 150, "rating": "Fair"}));
    assert_eq!(v["voc"], json!({"level": 100, "rating": "Good"}));
    // absent sensor reads as zero
    assert_eq!(v["pm25"], json!({"level": 0, "rating": "Good"}));
    assert_eq!(v["temperature"], json!({"level": 22.5}));

    let ts = v["timestamp"].as_str().unwrap();
    assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    assert!(ts.ends_with('Z'));
    assert!(v.get("time").is_none());
    let body = String::from_utf8(reply.body.clone()).unwrap();
    assert!(body.contains(r#""co2":{"level":1001,"rating":"Poor"}"#));
}

#[tokio::test]
#[serial_test::serial]
async fn missing_secret_is_a_config_failure() {
    clear_credentials();
    unsafe {
        std::env::set_var("AIRTHINGS_CLIENT_ID", CLIENT_ID);
        std::env::set_var("AIRTHINGS_DEVICE_ID", OFFICE);
    }
    let (upstream, hits) = serve_counter().await;
    let reply = call(proxy(&upstream.endpoints), Method::GET, "/airthings").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&reply.headers);
    let v = reply.json();
    assert_eq!(v["error"], "Failed to fetch air quality data");
    assert!(
        v["details"]
            .as_str()
            .unwrap()
            .contains("AIRTHINGS_CLIENT_SECRET")
    );
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[serial_test::serial]
async fn rejected_credentials_surface_as_500() {
    set_credentials("wrong-secret", Some(OFFICE), None);
    let upstream = serve_vendor(&[(OFFICE, json!({"co2": 500}))]).await;
    let reply = call(proxy(&upstream.endpoints), Method::GET, "/airthings").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["details"], "Token request failed: 401");
}

#[tokio::test]
#[serial_test::serial]
async fn token_without_access_token_is_an_auth_failure() {
    set_credentials(CLIENT_SECRET, Some(OFFICE), None);
    let router = Router::new().route(
        "/v1/token",
        post(|| async { axum::Json(json!({"token_type": "Bearer", "expires_in": 10800})) }),
    );
    let upstream = serve(router).await;
    let reply = call(proxy(&upstream.endpoints), Method::GET, "/airthings").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["details"], "No access token received");
}

#[tokio::test]
#[serial_test::serial]
async fn token_body_that_is_not_json_is_an_auth_failure() {
    set_credentials(CLIENT_SECRET, Some(OFFICE), None);
    let router = Router::new().route("/v1/token", post(|| async { "access_token=abc" }));
    let upstream = serve(router).await;
    let reply = call(proxy(&upstream.endpoints), Method::GET, "/airthings").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&reply.headers);
    let v = reply.json();
    assert_eq!(v["error"], "Failed to fetch air quality data");
    assert!(
        v["details"]
            .as_str()
            .unwrap()
            .starts_with("Token response was not valid JSON")
    );
}

#[tokio::test]
#[serial_test::serial]
async fn samples_without_data_read_as_zeros() {
    set_credentials(CLIENT_SECRET, Some(OFFICE), None);
    let router = Router::new()
        .route(
            "/v1/token",
            post(|| async { axum::Json(json!({"access_token": "abc"})) }),
        )
        .route(
            "/v1/devices/:id/latest-samples",
            get(|| async { axum::Json(json!({})) }),
        );
    let upstream = serve(router).await;

    let reply = call(proxy(&upstream.endpoints), Method::GET, "/airthings").await;
    assert_eq!(reply.status, StatusCode::OK);
    let v = reply.json();
    for field in ["humidity", "co2", "radon", "voc", "pm25", "temperature"] {
        assert_eq!(v[field]["level"], 0, "{field}");
    }
    assert_eq!(v["humidity"]["rating"], "Poor");
    assert_eq!(v["co2"]["rating"], "Good");
    assert!(v["timestamp"].is_string());
}

#[tokio::test]
#[serial_test::serial]
async fn device_failure_is_fatal_for_single_device() {
    set_credentials(CLIENT_SECRET, Some("unknown-device"), None);
    let upstream = serve_vendor(&[(OFFICE, json!({"co2": 500}))]).await;
    let reply = call(proxy(&upstream.endpoints), Method::GET, "/airthings").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&reply.headers);
    assert_eq!(reply.json()["details"], "Device request failed: 404");
}

#[tokio::test]
#[serial_test::serial]
async fn healthz_ok() {
    clear_credentials();
    let (upstream, _) = serve_counter().await;
    let reply = call(proxy(&upstream.endpoints), Method::GET, "/healthz").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["status"], "ok");
}
