use crate::error::ConfigError;
use std::fmt;

pub const CLIENT_ID_VAR: &str = "AIRTHINGS_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "AIRTHINGS_CLIENT_SECRET";
pub const OFFICE_DEVICE_ID_VAR: &str = "AIRTHINGS_DEVICE_ID";
pub const BEDROOM_DEVICE_ID_VAR: &str = "AIRTHINGS_BEDROOM_DEVICE_ID";

pub const DEFAULT_TOKEN_URL: &str = "https://accounts-api.airthings.com/v1/token";
pub const DEFAULT_API_URL: &str = "https://ext-api.airthings.com/v1";

pub fn read_env(key: &str, default: &str) -> String {
    read_env_optional(key).unwrap_or_else(|| default.to_string())
}

pub fn read_env_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    read_env_optional(key).ok_or(ConfigError::Missing(key))
}

/// Vendor credentials and device ids, read fresh for every request.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub office_device_id: String,
    pub bedroom_device_id: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: require(CLIENT_ID_VAR)?,
            client_secret: require(CLIENT_SECRET_VAR)?,
            office_device_id: require(OFFICE_DEVICE_ID_VAR)?,
            bedroom_device_id: read_env_optional(BEDROOM_DEVICE_ID_VAR),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("office_device_id", &self.office_device_id)
            .field("bedroom_device_id", &self.bedroom_device_id)
            .finish()
    }
}

/// Vendor URLs. Only overridden when pointing at a local mock.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub token_url: String,
    pub api_base: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self {
            token_url: read_env("AIRTHINGS_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_base: read_env("AIRTHINGS_API_URL", DEFAULT_API_URL),
        }
    }

    pub fn latest_samples_url(&self, device_id: &str) -> String {
        format!(
            "{}/devices/{}/latest-samples",
            self.api_base.trim_end_matches('/'),
            device_id
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: DEFAULT_API_URL.to_string(),
        }
    }
}
