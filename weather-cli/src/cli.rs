use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{debug, info};
use weather_core::{Pipeline, PipelineError, ServiceConfig, Stage, UnitSystem, WeatherReport};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Fetch and display current weather and a short forecast for a city",
    after_help = "Examples:\n  weather London\n  weather New York -f\n  weather Tokyo --fahrenheit"
)]
pub struct Cli {
    /// City name to look up; multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub city: Vec<String>,

    /// Display temperatures in Fahrenheit and wind in mph (default: Celsius, km/h).
    #[arg(short = 'f', long)]
    pub fahrenheit: bool,

    /// Increase log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn city_name(&self) -> String {
        self.city.join(" ")
    }

    pub fn units(&self) -> UnitSystem {
        UnitSystem::from_fahrenheit_flag(self.fahrenheit)
    }

    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let city = self.city_name();
        let units = self.units();
        let config = ServiceConfig::from_env();
        debug!(?config, "service configuration");

        let pipeline =
            Pipeline::open_meteo(&config).context("Failed to initialise the HTTP client")?;

        println!("\nFetching weather for {city}...\n");

        let outcome = tokio::select! {
            result = pipeline.run(&city, units) => Outcome::Finished(result),
            Ok(()) = tokio::signal::ctrl_c() => {
                info!("interrupted by user");
                Outcome::Cancelled
            }
        };

        let conclusion = conclude(&outcome, &city);
        conclusion.print();
        Ok(conclusion.exit_code())
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    Finished(Result<WeatherReport, PipelineError>),
    /// Interrupted with Ctrl-C before the pipeline finished.
    Cancelled,
}

/// What to print for an [`Outcome`] and the status to exit with.
#[derive(Debug, PartialEq, Eq)]
pub struct Conclusion {
    pub message: String,
    pub to_stderr: bool,
    pub status: u8,
}

impl Conclusion {
    fn success(message: String) -> Self {
        Self {
            message,
            to_stderr: false,
            status: 0,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            message,
            to_stderr: true,
            status: 1,
        }
    }

    fn print(&self) {
        if self.to_stderr {
            eprintln!("{}", self.message);
        } else {
            println!("{}", self.message);
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status)
    }
}

/// Rendered report on success, a one-line explanation on failure.
pub fn conclude(outcome: &Outcome, city: &str) -> Conclusion {
    match outcome {
        Outcome::Finished(Ok(report)) => Conclusion::success(render::render_report(report)),
        Outcome::Finished(Err(err)) => Conclusion::failure(failure_message(err, city)),
        Outcome::Cancelled => Conclusion::success("\nCancelled.".to_string()),
    }
}

/// One-line, user-facing explanation of a failed run.
pub fn failure_message(err: &PipelineError, city: &str) -> String {
    match err {
        PipelineError::LocationNotFound { .. } => format!(
            "City not found: Could not find '{city}'. Please check the spelling and try again."
        ),
        _ if err.is_connectivity_loss() => {
            "Error: No internet connection. Please check your network and try again.".to_string()
        }
        PipelineError::WeatherUnavailable { stage: Stage::Geocoding, source } => format!(
            "Error: Could not connect to the geocoding service ({}). Please try again later.",
            source.kind()
        ),
        PipelineError::WeatherUnavailable { stage: Stage::Forecast, source } => format!(
            "Error: Could not fetch weather data ({}). Please try again later.",
            source.kind()
        ),
    }
}
