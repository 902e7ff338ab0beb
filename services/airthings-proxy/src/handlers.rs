use crate::airthings::AccessToken;
use crate::config::Credentials;
use crate::error::{DeviceFetchError, ProxyError};
use crate::report::{DeviceOutcome, DualDeviceReport, SingleDeviceReport};
use crate::{AppState, SharedState};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use time::OffsetDateTime;

fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Answers everything except `GET`. `None` means the request should be served.
fn preflight_or_reject(method: &Method, request_id: &str) -> Option<Response> {
    match *method {
        Method::GET => None,
        Method::OPTIONS => Some(StatusCode::OK.into_response()),
        ref other => {
            tracing::warn!(%request_id, method = %other, "method not allowed");
            Some(
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    Json(json!({"error": "Method not allowed"})),
                )
                    .into_response(),
            )
        }
    }
}

// --- Single device ---

pub async fn single_device(
    State(state): State<SharedState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers);
    if let Some(response) = preflight_or_reject(&method, request_id) {
        return response;
    }

    match single_device_report(&state).await {
        Ok(report) => {
            tracing::info!(%request_id, "single device report served");
            Json(report).into_response()
        }
        Err(e) => {
            tracing::error!(%request_id, error = %e, "single device request failed");
            e.into_response()
        }
    }
}

async fn single_device_report(state: &SharedState) -> Result<SingleDeviceReport, ProxyError> {
    let creds = Credentials::from_env()?;
    let token = state
        .airthings
        .fetch_token(&creds.client_id, &creds.client_secret)
        .await?;
    let samples = state
        .airthings
        .fetch_latest_samples(&token, &creds.office_device_id)
        .await?;
    Ok(SingleDeviceReport::new(
        &samples.data.unwrap_or_default(),
        OffsetDateTime::now_utc(),
    ))
}

// --- Dual device ---

pub async fn dual_device(
    State(state): State<SharedState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers);
    if let Some(response) = preflight_or_reject(&method, request_id) {
        return response;
    }

    match dual_device_report(&state).await {
        Ok(report) => {
            tracing::info!(
                %request_id,
                office = report.office.is_some(),
                bedroom = report.bedroom.is_some(),
                "dual device report served"
            );
            Json(report).into_response()
        }
        Err(e) => {
            tracing::error!(%request_id, error = %e, "dual device request failed");
            e.into_response()
        }
    }
}

async fn dual_device_report(state: &SharedState) -> Result<DualDeviceReport, ProxyError> {
    let creds = Credentials::from_env()?;
    let token = state
        .airthings
        .fetch_token(&creds.client_id, &creds.client_secret)
        .await?;

    let (office, bedroom): (DeviceOutcome, DeviceOutcome) = tokio::join!(
        fetch_device(state, &token, Some(creds.office_device_id.as_str())),
        fetch_device(state, &token, creds.bedroom_device_id.as_deref()),
    );

    Ok(DualDeviceReport::assemble(
        office,
        bedroom,
        OffsetDateTime::now_utc(),
    ))
}

async fn fetch_device(
    state: &AppState,
    token: &AccessToken,
    device_id: Option<&str>,
) -> DeviceOutcome {
    let device_id = device_id?;
    let outcome = state
        .airthings
        .fetch_latest_samples(token, device_id)
        .await
        .and_then(|samples| samples.data.ok_or(DeviceFetchError::MissingData));
    Some(outcome)
}
