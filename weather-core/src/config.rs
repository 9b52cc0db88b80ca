use std::time::Duration;

use tracing::warn;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const GEOCODING_URL_VAR: &str = "WEATHER_GEOCODING_URL";
pub const FORECAST_URL_VAR: &str = "WEATHER_FORECAST_URL";
pub const TIMEOUT_SECS_VAR: &str = "WEATHER_TIMEOUT_SECS";

/// Endpoints and request limits for the remote services.
///
/// Lives only for one run; nothing is read from or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    /// Per-request timeout, applied to both services.
    pub timeout: Duration,
    /// How many candidates to ask the geocoder for. Only the first is used.
    pub result_count: u8,
    pub forecast_days: u8,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            result_count: 5,
            forecast_days: 5,
            user_agent: concat!("weather-cli/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ServiceConfig {
    /// Defaults, with any `WEATHER_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values are ignored, as are timeouts that are not a positive
    /// number of seconds.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = get(GEOCODING_URL_VAR) {
            self.geocoding_url = url;
        }
        if let Some(url) = get(FORECAST_URL_VAR) {
            self.forecast_url = url;
        }
        if let Some(raw) = get(TIMEOUT_SECS_VAR) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid {TIMEOUT_SECS_VAR}"),
            }
        }

        self
    }

    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
