use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::ServiceConfig,
    error::{GeoError, NetworkError},
    model::Location,
};

use super::{Geocoder, get_json, http_client};

/// Open-Meteo geocoding search.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: Client,
    url: String,
    count: u8,
}

impl GeocodingClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(http_client(config)?, config))
    }

    /// Reuse an existing HTTP client (and its connection pool).
    pub fn with_client(http: Client, config: &ServiceConfig) -> Self {
        Self {
            http,
            url: config.geocoding_url.clone(),
            count: config.result_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    /// Absent entirely when nothing matched.
    #[serde(default)]
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl GeoResult {
    fn into_location(self, place_name: &str) -> Location {
        Location {
            name: self.name.unwrap_or_else(|| place_name.to_string()),
            latitude: self.latitude,
            longitude: self.longitude,
            country: self.country.unwrap_or_default(),
            admin_region: self.admin1.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn resolve(&self, place_name: &str) -> Result<Location, GeoError> {
        let query = [("name", place_name.to_string()), ("count", self.count.to_string())];
        let parsed: GeoResponse = get_json(&self.http, "geocoding", &self.url, &query).await?;

        let results = parsed.results.unwrap_or_default();
        debug!(candidates = results.len(), place = place_name, "geocoding answered");

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::NotFound(place_name.to_string()))?;

        let location = first.into_location(place_name);
        if !location.has_valid_coordinates() {
            return Err(NetworkError::malformed(format!(
                "geocoding returned out-of-range coordinates ({}, {})",
                location.latitude, location.longitude
            ))
            .into());
        }

        info!(
            name = %location.name,
            lat = location.latitude,
            lon = location.longitude,
            "resolved location"
        );

        Ok(location)
    }
}
