use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::{
    config::ServiceConfig,
    error::FetchError,
    model::{UnitSystem, WeatherPayload},
};

use super::{ForecastSource, get_json, http_client};

pub const CURRENT_FIELDS: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "weather_code",
    "wind_speed_10m",
    "wind_direction_10m",
];

pub const DAILY_FIELDS: &[&str] = &[
    "temperature_2m_max",
    "temperature_2m_min",
    "weather_code",
    "precipitation_sum",
    "sunrise",
    "sunset",
];

/// Open-Meteo forecast endpoint.
///
/// Unit conversion is done server-side: for [`UnitSystem::Imperial`] the
/// request asks for Fahrenheit and mph instead of converting locally.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    url: String,
    days: u8,
}

impl ForecastClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(http_client(config)?, config))
    }

    pub fn with_client(http: Client, config: &ServiceConfig) -> Self {
        Self {
            http,
            url: config.forecast_url.clone(),
            days: config.forecast_days,
        }
    }

    fn query(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.join(",")),
            ("daily", DAILY_FIELDS.join(",")),
            ("timezone", "auto".to_string()),
            ("forecast_days", self.days.to_string()),
        ];

        if units == UnitSystem::Imperial {
            query.push(("temperature_unit", "fahrenheit".to_string()));
            query.push(("wind_speed_unit", "mph".to_string()));
        }

        query
    }
}

#[async_trait]
impl ForecastSource for ForecastClient {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<WeatherPayload, FetchError> {
        let query = self.query(latitude, longitude, units);
        let payload: WeatherPayload = get_json(&self.http, "forecast", &self.url, &query).await?;

        info!(
            lat = latitude,
            lon = longitude,
            units = ?units,
            days = payload.daily.time.len(),
            "fetched forecast"
        );

        Ok(payload)
    }
}
