use crate::types::{ErrorResp, LatestSamplesResp, TokenReq, TokenResp};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::{Form, Json};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Lifetime the vendor advertises for client-credentials tokens.
pub const TOKEN_TTL: Duration = Duration::hours(3);

pub struct MockState {
    client_id: String,
    client_secret: String,
    devices: HashMap<String, Value>,
    token_ttl: Duration,
    issued: RwLock<HashMap<String, OffsetDateTime>>,
}

fn cleanup_expired(tokens: &mut HashMap<String, OffsetDateTime>) {
    let now = OffsetDateTime::now_utc();
    tokens.retain(|_, expires_at| *expires_at > now);
}

impl MockState {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            devices: HashMap::new(),
            token_ttl: TOKEN_TTL,
            issued: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Registers a device whose latest samples are served verbatim as `data`.
    pub fn with_device(mut self, device_id: impl Into<String>, sample: Value) -> Self {
        self.devices.insert(device_id.into(), sample);
        self
    }
}

pub type SharedState = Arc<MockState>;

type ApiError = (StatusCode, Json<ErrorResp>);

fn reject(status: StatusCode, msg: &str) -> ApiError {
    (
        status,
        Json(ErrorResp {
            error: msg.to_string(),
        }),
    )
}

fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

// --- Token ---

pub async fn token(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(req): Form<TokenReq>,
) -> Result<Json<TokenResp>, ApiError> {
    let request_id = request_id(&headers);
    tracing::info!(%request_id, client_id = %req.client_id, scope = ?req.scope, "token request");
    if req.grant_type != "client_credentials" {
        tracing::warn!(%request_id, grant_type = %req.grant_type, "token request failed: unsupported grant");
        return Err(reject(StatusCode::BAD_REQUEST, "unsupported_grant_type"));
    }
    if req.client_id != state.client_id || req.client_secret != state.client_secret {
        tracing::warn!(%request_id, client_id = %req.client_id, "token request failed: invalid client");
        return Err(reject(StatusCode::UNAUTHORIZED, "invalid_client"));
    }

    let access_token = Uuid::new_v4().to_string();
    {
        let mut issued = state.issued.write().await;
        cleanup_expired(&mut issued);
        issued.insert(
            access_token.clone(),
            OffsetDateTime::now_utc() + state.token_ttl,
        );
    }

    tracing::info!(%request_id, client_id = %req.client_id, "token issued");
    Ok(Json(TokenResp {
        access_token,
        token_type: "Bearer",
        expires_in: state.token_ttl.whole_seconds().max(0) as u64,
    }))
}

// --- Latest samples ---

pub async fn latest_samples(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
) -> Result<Json<LatestSamplesResp>, ApiError> {
    let request_id = request_id(&headers);
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "missing bearer token"))?;

    let now = OffsetDateTime::now_utc();
    let live = state
        .issued
        .read()
        .await
        .get(token)
        .is_some_and(|expires_at| *expires_at > now);
    if !live {
        tracing::warn!(%request_id, %device_id, "latest samples rejected: unknown or expired token");
        return Err(reject(StatusCode::UNAUTHORIZED, "invalid token"));
    }

    let data = state.devices.get(&device_id).cloned().ok_or_else(|| {
        tracing::warn!(%request_id, %device_id, "latest samples for unknown device");
        reject(StatusCode::NOT_FOUND, "device not found")
    })?;

    tracing::info!(%request_id, %device_id, "latest samples served");
    Ok(Json(LatestSamplesResp { data }))
}
