//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The WMO weather-code table and display formatting
//! - Geocoding and forecast clients for Open-Meteo, behind async traits
//! - The pipeline that sequences them into a [`WeatherReport`]
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod codes;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::ServiceConfig;
pub use error::{FetchError, GeoError, NetworkError, NetworkErrorKind, PipelineError, Stage};
pub use model::{
    CurrentConditions, DailyForecastEntry, Location, UnitSystem, WeatherPayload, WeatherReport,
};
pub use pipeline::Pipeline;
pub use provider::{ForecastClient, ForecastSource, Geocoder, GeocodingClient};
