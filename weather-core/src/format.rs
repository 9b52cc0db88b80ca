//! Display formatting for temperatures, wind, times and dates.
//!
//! All functions here are total: bad input degrades to something printable
//! rather than an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::UnitSystem;

/// 16-point compass rose, clockwise from north.
pub const DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const SECTOR_DEGREES: f64 = 22.5;

pub fn format_temperature(value: f64, units: UnitSystem) -> String {
    format!("{value:.1}{}", units.temperature_unit())
}

/// `"12.5 km/h SW"` style wind summary.
pub fn format_wind(speed: f64, direction_degrees: f64, units: UnitSystem) -> String {
    format!(
        "{speed:.1} {} {}",
        units.wind_speed_unit(),
        cardinal_direction(direction_degrees)
    )
}

/// Compass label for a bearing in degrees.
///
/// The bearing is wrapped into `[0, 360)` first. Exact half-sector bearings
/// (11.25°, 33.75°, ...) round away from zero, so 11.25° is `NNE`.
pub fn cardinal_direction(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return DIRECTIONS[0];
    }
    let normalized = degrees.rem_euclid(360.0);
    let sector = (normalized / SECTOR_DEGREES).round() as usize % DIRECTIONS.len();
    DIRECTIONS[sector]
}

pub fn format_humidity(percent: u8) -> String {
    format!("{percent}%")
}

pub fn format_precipitation(amount: f64, units: UnitSystem) -> String {
    format!("{amount:.1} {}", units.precipitation_unit())
}

/// `Sun 03/10`
pub fn format_day(date: NaiveDate) -> String {
    date.format("%a %m/%d").to_string()
}

/// Render a local ISO-8601 timestamp as `6:45 AM`.
///
/// A trailing UTC offset is accepted and the wall-clock time kept as written.
/// Input that does not parse is returned unchanged.
pub fn format_clock_time(timestamp: &str) -> String {
    match parse_local_timestamp(timestamp) {
        Some(dt) => dt.format("%-I:%M %p").to_string(),
        None => timestamp.to_string(),
    }
}

fn parse_local_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
