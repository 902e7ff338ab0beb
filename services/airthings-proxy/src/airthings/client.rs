use crate::airthings::types::{AccessToken, LatestSamples, TokenResponse};
use crate::config::Endpoints;
use crate::error::{AuthError, DeviceFetchError};
use reqwest::Client;
use reqwest::header::ACCEPT;

pub const TOKEN_SCOPE: &str = "read:device:current_values";

#[derive(Clone)]
pub struct AirthingsClient {
    client: Client,
    endpoints: Endpoints,
}

impl AirthingsClient {
    pub fn new(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// OAuth2 client-credentials exchange. Never cached: every call hits the
    /// token endpoint.
    pub async fn fetch_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken, AuthError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", TOKEN_SCOPE),
        ];
        let response = self
            .client
            .post(&self.endpoints.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "token request could not be sent");
                AuthError::Request(e)
            })?;

        let status = response.status();
        let contents = response.text().await.map_err(AuthError::Request)?;
        if !status.is_success() {
            tracing::error!(%status, body = %contents, "token request failed");
            return Err(AuthError::Status(status));
        }

        let token: TokenResponse = serde_json::from_str(&contents).map_err(|e| {
            tracing::error!(error = %e, "token response was not valid JSON");
            AuthError::Decode(e)
        })?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| {
                tracing::error!("token response carried no access_token");
                AuthError::MissingToken
            })
    }

    pub async fn fetch_latest_samples(
        &self,
        token: &AccessToken,
        device_id: &str,
    ) -> Result<LatestSamples, DeviceFetchError> {
        let url = self.endpoints.latest_samples_url(device_id);
        let response = self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%device_id, error = %e, "device request could not be sent");
                DeviceFetchError::Request(e)
            })?;

        let status = response.status();
        let contents = response.text().await.map_err(DeviceFetchError::Request)?;
        if !status.is_success() {
            tracing::error!(%device_id, %status, body = %contents, "device request failed");
            return Err(DeviceFetchError::Status(status));
        }

        tracing::debug!(%device_id, raw = %contents, "raw device data");
        serde_json::from_str(&contents).map_err(|e| {
            tracing::error!(%device_id, error = %e, "device response was not valid JSON");
            DeviceFetchError::Decode(e)
        })
    }
}
