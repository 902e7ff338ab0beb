//! Failure taxonomy for one proxy invocation.
//!
//! Every variant ends up as the same HTTP 500 body; the split exists so the
//! dual-device handler can hold a [`DeviceFetchError`] per device without
//! failing the whole request.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Generic message returned in the `error` field of every 500 response.
pub const FETCH_FAILED: &str = "Failed to fetch air quality data";

/// A required environment variable is missing or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing API credentials: {key} is not set"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The client-credentials exchange did not yield a bearer token.
#[derive(Debug)]
pub enum AuthError {
    Request(reqwest::Error),
    Status(StatusCode),
    Decode(serde_json::Error),
    MissingToken,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Request(e) => write!(f, "Token request failed: {e}"),
            AuthError::Status(s) => write!(f, "Token request failed: {}", s.as_u16()),
            AuthError::Decode(e) => write!(f, "Token response was not valid JSON: {e}"),
            AuthError::MissingToken => write!(f, "No access token received"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Request(e) => Some(e),
            AuthError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// Reading one device's latest samples failed.
#[derive(Debug)]
pub enum DeviceFetchError {
    Request(reqwest::Error),
    Status(StatusCode),
    Decode(serde_json::Error),
    /// The vendor answered 2xx without a `data` object.
    MissingData,
}

impl fmt::Display for DeviceFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceFetchError::Request(e) => write!(f, "Device request failed: {e}"),
            DeviceFetchError::Status(s) => write!(f, "Device request failed: {}", s.as_u16()),
            DeviceFetchError::Decode(e) => write!(f, "Device response was not valid JSON: {e}"),
            DeviceFetchError::MissingData => write!(f, "Device response contained no data"),
        }
    }
}

impl std::error::Error for DeviceFetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceFetchError::Request(e) => Some(e),
            DeviceFetchError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// Anything that aborts an invocation with a 500.
#[derive(Debug)]
pub enum ProxyError {
    Config(ConfigError),
    Auth(AuthError),
    DeviceFetch(DeviceFetchError),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::Config(e) => fmt::Display::fmt(e, f),
            ProxyError::Auth(e) => fmt::Display::fmt(e, f),
            ProxyError::DeviceFetch(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Config(e) => Some(e),
            ProxyError::Auth(e) => Some(e),
            ProxyError::DeviceFetch(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ProxyError {
    fn from(e: ConfigError) -> Self {
        ProxyError::Config(e)
    }
}

impl From<AuthError> for ProxyError {
    fn from(e: AuthError) -> Self {
        ProxyError::Auth(e)
    }
}

impl From<DeviceFetchError> for ProxyError {
    fn from(e: DeviceFetchError) -> Self {
        ProxyError::DeviceFetch(e)
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub details: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: FETCH_FAILED,
            details: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
