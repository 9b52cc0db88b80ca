use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Unit system the forecast service is asked to report in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn from_fahrenheit_flag(fahrenheit: bool) -> Self {
        if fahrenheit {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        }
    }

    pub fn temperature_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn wind_speed_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }

    /// Precipitation is reported in millimetres whatever the unit system.
    pub fn precipitation_unit(self) -> &'static str {
        "mm"
    }
}

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Empty when the geocoder did not report one.
    pub country: String,
    /// State, province or similar; empty when unknown.
    pub admin_region: String,
}

impl Location {
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `name, admin region, country`, skipping empty parts.
    pub fn display_name(&self) -> String {
        [&self.name, &self.admin_region, &self.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub relative_humidity: u8,
    /// `None` when the service reported the code as `null`.
    pub weather_code: Option<i32>,
    pub wind_speed: f64,
    pub wind_direction_degrees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub weather_code: Option<i32>,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub precipitation_sum: f64,
    /// Local timestamp as sent upstream, e.g. `2024-03-10T06:45`.
    pub sunrise: String,
    pub sunset: String,
}

/// Everything one successful run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub units: UnitSystem,
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
}

/// Raw forecast response, as decoded from the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherPayload {
    pub current: RawCurrent,
    pub daily: RawDaily,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCurrent {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    /// Absent means clear sky (code 0); `null` means unknown.
    #[serde(default = "clear_sky")]
    pub weather_code: Option<i32>,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
}

/// Index-aligned daily arrays; `time[i]` is the date of every other `[i]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_sum: Vec<f64>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
}

fn clear_sky() -> Option<i32> {
    Some(0)
}

impl WeatherPayload {
    /// Split the payload into current conditions and per-day entries.
    ///
    /// Fails when the daily arrays disagree in length or a date does not parse.
    pub fn normalize(self) -> Result<(CurrentConditions, Vec<DailyForecastEntry>), NetworkError> {
        let current = self.current.into_conditions();
        let daily = self.daily.into_entries()?;
        Ok((current, daily))
    }
}

impl RawCurrent {
    fn into_conditions(self) -> CurrentConditions {
        CurrentConditions {
            temperature: self.temperature_2m,
            apparent_temperature: self.apparent_temperature,
            relative_humidity: self.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
            weather_code: self.weather_code,
            wind_speed: self.wind_speed_10m,
            wind_direction_degrees: self.wind_direction_10m,
        }
    }
}

impl RawDaily {
    fn into_entries(self) -> Result<Vec<DailyForecastEntry>, NetworkError> {
        let days = self.time.len();
        let lengths = [
            ("weather_code", self.weather_code.len()),
            ("temperature_2m_max", self.temperature_2m_max.len()),
            ("temperature_2m_min", self.temperature_2m_min.len()),
            ("precipitation_sum", self.precipitation_sum.len()),
            ("sunrise", self.sunrise.len()),
            ("sunset", self.sunset.len()),
        ];
        if let Some((field, len)) = lengths.iter().find(|(_, len)| *len != days) {
            return Err(NetworkError::malformed(format!(
                "daily field '{field}' has {len} entries, expected {days}"
            )));
        }

        let mut entries = Vec::with_capacity(days);
        let columns = self
            .time
            .into_iter()
            .zip(self.weather_code)
            .zip(self.temperature_2m_max)
            .zip(self.temperature_2m_min)
            .zip(self.precipitation_sum)
            .zip(self.sunrise)
            .zip(self.sunset);

        for ((((((time, code), max), min), precipitation), sunrise), sunset) in columns {
            let date = NaiveDate::parse_from_str(&time, "%Y-%m-%d").map_err(|e| {
                NetworkError::malformed(format!("invalid daily date '{time}': {e}"))
            })?;

            entries.push(DailyForecastEntry {
                date,
                weather_code: code,
                temperature_max: max,
                temperature_min: min,
                precipitation_sum: precipitation.max(0.0),
                sunrise,
                sunset,
            });
        }

        Ok(entries)
    }
}
