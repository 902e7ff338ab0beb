use serde::Deserialize;
use serde_json::Number;
use std::fmt;

#[derive(Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Bearer token scoped to `read:device:current_values`. Lives for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
pub struct LatestSamples {
    #[serde(default)]
    pub data: Option<RawSample>,
}

/// Sensor values as reported by the vendor. Fields the device model lacks
/// (or reports as `null`) stay `None`; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSample {
    #[serde(default)]
    pub humidity: Option<Number>,
    #[serde(default)]
    pub co2: Option<Number>,
    #[serde(default)]
    pub radon_short_term_avg: Option<Number>,
    #[serde(default)]
    pub voc: Option<Number>,
    #[serde(default)]
    pub pm25: Option<Number>,
    #[serde(default)]
    pub temp: Option<Number>,
    #[serde(default)]
    pub pressure: Option<Number>,
}
