use tracing::{debug, instrument};

use crate::{
    config::ServiceConfig,
    error::{PipelineError, Stage},
    model::{UnitSystem, WeatherReport},
    provider::{ForecastClient, ForecastSource, Geocoder, GeocodingClient, http_client},
};

/// Geocode a place, then fetch and normalize its forecast.
///
/// Each [`Pipeline::run`] is independent: the pipeline holds no state
/// between runs beyond the clients themselves.
#[derive(Debug, Clone)]
pub struct Pipeline<G, F> {
    geocoder: G,
    forecast: F,
}

impl Pipeline<GeocodingClient, ForecastClient> {
    /// Production wiring against Open-Meteo, with one shared connection pool.
    pub fn open_meteo(config: &ServiceConfig) -> Result<Self, reqwest::Error> {
        let http = http_client(config)?;
        Ok(Self::new(
            GeocodingClient::with_client(http.clone(), config),
            ForecastClient::with_client(http, config),
        ))
    }
}

impl<G, F> Pipeline<G, F>
where
    G: Geocoder,
    F: ForecastSource,
{
    pub fn new(geocoder: G, forecast: F) -> Self {
        Self { geocoder, forecast }
    }

    /// Resolve `place_name` and fetch its weather in `units`.
    ///
    /// Either both steps succeed and a full report is returned, or nothing is.
    #[instrument(skip(self))]
    pub async fn run(
        &self,
        place_name: &str,
        units: UnitSystem,
    ) -> Result<WeatherReport, PipelineError> {
        let location = self
            .geocoder
            .resolve(place_name)
            .await
            .inspect_err(|e| debug!(error = %e, "geocoding failed"))?;

        debug!(lat = location.latitude, lon = location.longitude, "fetching forecast");

        let payload = self
            .forecast
            .fetch(location.latitude, location.longitude, units)
            .await
            .inspect_err(|e| debug!(error = %e, "forecast failed"))?;

        let (current, daily) = payload
            .normalize()
            .map_err(|source| PipelineError::WeatherUnavailable {
                stage: Stage::Forecast,
                source,
            })?;

        Ok(WeatherReport {
            location,
            units,
            current,
            daily,
        })
    }
}
