//! WMO weather interpretation codes as used by Open-Meteo.
//!
//! The code set and wording follow the upstream documentation and must stay
//! stable; they are what the forecast service sends in `weather_code`.

/// Description and icon used for codes not present in [`WEATHER_CODES`].
pub const UNKNOWN: (&str, &str) = ("Unknown", "🌡️");

/// `(code, description, icon)`, sorted by code.
static WEATHER_CODES: &[(i32, &str, &str)] = &[
    (0, "Clear sky", "☀️"),
    (1, "Mainly clear", "🌤️"),
    (2, "Partly cloudy", "⛅"),
    (3, "Overcast", "☁️"),
    (45, "Fog", "🌫️"),
    (48, "Depositing rime fog", "🌫️"),
    (51, "Light drizzle", "🌦️"),
    (53, "Moderate drizzle", "🌦️"),
    (55, "Dense drizzle", "🌧️"),
    (56, "Light freezing drizzle", "🌧️"),
    (57, "Dense freezing drizzle", "🌧️"),
    (61, "Slight rain", "🌧️"),
    (63, "Moderate rain", "🌧️"),
    (65, "Heavy rain", "🌧️"),
    (66, "Light freezing rain", "🌧️"),
    (67, "Heavy freezing rain", "🌧️"),
    (71, "Slight snowfall", "❄️"),
    (73, "Moderate snowfall", "❄️"),
    (75, "Heavy snowfall", "❄️"),
    (77, "Snow grains", "❄️"),
    (80, "Slight rain showers", "🌦️"),
    (81, "Moderate rain showers", "🌦️"),
    (82, "Violent rain showers", "🌧️"),
    (85, "Slight snow showers", "❄️"),
    (86, "Heavy snow showers", "❄️"),
    (95, "Thunderstorm", "⛈️"),
    (96, "Thunderstorm with slight hail", "⛈️"),
    (99, "Thunderstorm with heavy hail", "⛈️"),
];

/// Look up `(description, icon)` for a weather code. Never fails.
pub fn describe(code: i32) -> (&'static str, &'static str) {
    WEATHER_CODES
        .binary_search_by_key(&code, |&(c, _, _)| c)
        .map(|idx| {
            let (_, description, icon) = WEATHER_CODES[idx];
            (description, icon)
        })
        .unwrap_or(UNKNOWN)
}

/// Like [`describe`], for a code the service may have sent as `null`.
pub fn describe_reported(code: Option<i32>) -> (&'static str, &'static str) {
    code.map_or(UNKNOWN, describe)
}

pub fn description(code: i32) -> &'static str {
    describe(code).0
}

pub fn icon(code: i32) -> &'static str {
    describe(code).1
}

/// All codes the table knows, ascending.
pub fn known_codes() -> impl Iterator<Item = i32> {
    WEATHER_CODES.iter().map(|&(code, _, _)| code)
}
