use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

use crate::{
    config::ServiceConfig,
    error::{FetchError, GeoError, NetworkError, NetworkErrorKind},
    model::{Location, UnitSystem, WeatherPayload},
};

pub mod forecast;
pub mod geocoding;

pub use forecast::ForecastClient;
pub use geocoding::GeocodingClient;

/// Resolves free text to a single place.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, place_name: &str) -> Result<Location, GeoError>;
}

/// Retrieves current conditions and the daily forecast for a coordinate.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<WeatherPayload, FetchError>;
}

/// Build the HTTP client both services share. Pools connections, caches nothing.
pub fn http_client(config: &ServiceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
}

/// GET `url` with `query` and decode a JSON body, folding every failure into
/// a [`NetworkError`].
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    service: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, NetworkError> {
    debug!(service, url, "sending request");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| NetworkError::from_transport(service, &e))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| NetworkError::from_transport(service, &e))?;

    if !status.is_success() {
        return Err(NetworkError::new(
            NetworkErrorKind::Status(status.as_u16()),
            format!("{service} request failed: {}", truncate_body(&body)),
        ));
    }

    debug!(service, status = status.as_u16(), bytes = body.len(), "response received");

    serde_json::from_str(&body)
        .map_err(|e| NetworkError::malformed(format!("failed to parse {service} JSON: {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
