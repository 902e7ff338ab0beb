//! Outbound calls to the Airthings cloud: token exchange and latest samples.

mod client;
mod types;

pub use client::{AirthingsClient, TOKEN_SCOPE};
pub use types::{AccessToken, LatestSamples, RawSample, TokenResponse};
