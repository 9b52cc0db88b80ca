//! Integration tests for the Open-Meteo clients using WireMock
//!
//! The clients and the pipeline are pointed at a local mock server through
//! `ServiceConfig`, so the real request building and response decoding run.

use std::time::Duration;

use weather_core::{
    ForecastClient, ForecastSource, Geocoder, GeoError, GeocodingClient, NetworkErrorKind,
    Pipeline, PipelineError, ServiceConfig, Stage, UnitSystem, codes,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param, query_param_is_missing},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config(server: &MockServer) -> ServiceConfig {
    ServiceConfig::default()
        .with_geocoding_url(format!("{}/v1/search", server.uri()))
        .with_forecast_url(format!("{}/v1/forecast", server.uri()))
        .with_timeout(Duration::from_secs(2))
}

fn springfield_geocoding() -> serde_json::Value {
    serde_json::json!({
        "results": [
            {
                "id": 4250542,
                "name": "Springfield",
                "latitude": 39.78,
                "longitude": -89.65,
                "country": "United States",
                "admin1": "Illinois"
            },
            {
                "id": 4409896,
                "name": "Springfield",
                "latitude": 37.22,
                "longitude": -93.30,
                "country": "United States",
                "admin1": "Missouri"
            }
        ],
        "generationtime_ms": 0.7
    })
}

fn springfield_forecast() -> serde_json::Value {
    serde_json::json!({
        "latitude": 39.78,
        "longitude": -89.65,
        "timezone": "America/Chicago",
        "current": {
            "time": "2024-06-01T14:00",
            "temperature_2m": 24.6,
            "relative_humidity_2m": 52,
            "apparent_temperature": 25.1,
            "weather_code": 0,
            "wind_speed_10m": 11.2,
            "wind_direction_10m": 200
        },
        "daily": {
            "time": ["2024-06-01"],
            "temperature_2m_max": [27.3],
            "temperature_2m_min": [15.9],
            "weather_code": [3],
            "precipitation_sum": [0.0],
            "sunrise": ["2024-06-01T05:33"],
            "sunset": ["2024-06-01T20:22"]
        }
    })
}

async fn mount_geocoding(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// =============================================================================
// Geocoding Tests
// =============================================================================

mod geocoding_tests {
    use super::*;

    #[tokio::test]
    async fn sends_name_and_count_and_takes_first_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Springfield"))
            .and(query_param("count", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(springfield_geocoding()))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeocodingClient::new(&test_config(&server)).unwrap();
        let location = client.resolve("Springfield").await.unwrap();

        assert_eq!(location.name, "Springfield");
        assert_eq!(location.latitude, 39.78);
        assert_eq!(location.longitude, -89.65);
        assert_eq!(location.admin_region, "Illinois");
        assert_eq!(location.country, "United States");
    }

    #[tokio::test]
    async fn multi_word_names_are_sent_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "New York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "name": "New York", "latitude": 40.71, "longitude": -74.01 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeocodingClient::new(&test_config(&server)).unwrap();
        let location = client.resolve("New York").await.unwrap();

        assert_eq!(location.name, "New York");
    }

    #[tokio::test]
    async fn empty_results_is_not_found() {
        let server = MockServer::start().await;
        mount_geocoding(&server, serde_json::json!({ "results": [] })).await;

        let client = GeocodingClient::new(&test_config(&server)).unwrap();
        let err = client.resolve("Atlantis").await.unwrap_err();

        assert!(matches!(err, GeoError::NotFound(ref place) if place == "Atlantis"));
    }

    #[tokio::test]
    async fn absent_results_is_not_found() {
        let server = MockServer::start().await;
        mount_geocoding(&server, serde_json::json!({ "generationtime_ms": 0.3 })).await;

        let client = GeocodingClient::new(&test_config(&server)).unwrap();
        let err = client.resolve("Atlantis").await.unwrap_err();

        assert!(matches!(err, GeoError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_optional_fields_become_empty() {
        let server = MockServer::start().await;
        mount_geocoding(
            &server,
            serde_json::json!({
                "results": [{ "latitude": -33.87, "longitude": 151.21 }]
            }),
        )
        .await;

        let client = GeocodingClient::new(&test_config(&server)).unwrap();
        let location = client.resolve("sydney").await.unwrap();

        assert_eq!(location.name, "sydney");
        assert_eq!(location.country, "");
        assert_eq!(location.admin_region, "");
    }

    #[tokio::test]
    async fn server_error_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let client = GeocodingClient::new(&test_config(&server)).unwrap();
        let err = client.resolve("Springfield").await.unwrap_err();

        match err {
            GeoError::Network(e) => {
                assert_eq!(e.kind(), NetworkErrorKind::Status(500));
                assert!(e.message().contains("internal error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = GeocodingClient::new(&test_config(&server)).unwrap();
        let err = client.resolve("Springfield").await.unwrap_err();

        assert!(
            matches!(err, GeoError::Network(ref e) if e.kind() == NetworkErrorKind::Malformed)
        );
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_malformed() {
        let server = MockServer::start().await;
        mount_geocoding(
            &server,
            serde_json::json!({
                "results": [{ "name": "Nowhere", "latitude": 123.0, "longitude": 0.0 }]
            }),
        )
        .await;

        let client = GeocodingClient::new(&test_config(&server)).unwrap();
        let err = client.resolve("Nowhere").await.unwrap_err();

        assert!(
            matches!(err, GeoError::Network(ref e) if e.kind() == NetworkErrorKind::Malformed)
        );
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(springfield_geocoding())
                    .set_delay(Duration::from_millis(800)),
            )
            .mount(&server)
            .await;

        let config = test_config(&server).with_timeout(Duration::from_millis(100));
        let client = GeocodingClient::new(&config).unwrap();
        let err = client.resolve("Springfield").await.unwrap_err();

        assert!(matches!(err, GeoError::Network(ref e) if e.kind() == NetworkErrorKind::Timeout));
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        // Bind then release a port so nothing is listening on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .unwrap()
            .port();
        let config = ServiceConfig::default()
            .with_geocoding_url(format!("http://127.0.0.1:{port}/v1/search"));

        let client = GeocodingClient::new(&config).unwrap();
        let err = client.resolve("Springfield").await.unwrap_err();

        assert!(matches!(err, GeoError::Network(ref e) if e.is_unreachable()));
    }

    #[tokio::test]
    async fn unusable_url_is_a_request_error() {
        let config = ServiceConfig::default().with_geocoding_url("not a url");

        let client = GeocodingClient::new(&config).unwrap();
        let err = client.resolve("Springfield").await.unwrap_err();

        match err {
            GeoError::Network(e) => {
                assert_eq!(e.kind(), NetworkErrorKind::Request);
                assert!(!e.is_unreachable());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

// =============================================================================
// Forecast Tests
// =============================================================================

mod forecast_tests {
    use super::*;

    #[tokio::test]
    async fn metric_request_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "39.78"))
            .and(query_param("longitude", "-89.65"))
            .and(query_param(
                "current",
                "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m,wind_direction_10m",
            ))
            .and(query_param(
                "daily",
                "temperature_2m_max,temperature_2m_min,weather_code,precipitation_sum,sunrise,sunset",
            ))
            .and(query_param("timezone", "auto"))
            .and(query_param("forecast_days", "5"))
            .and(query_param_is_missing("temperature_unit"))
            .and(query_param_is_missing("wind_speed_unit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(springfield_forecast()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ForecastClient::new(&test_config(&server)).unwrap();
        let payload = client.fetch(39.78, -89.65, UnitSystem::Metric).await.unwrap();

        assert_eq!(payload.current.weather_code, Some(0));
        assert_eq!(payload.daily.weather_code, vec![Some(3)]);
    }

    #[tokio::test]
    async fn imperial_request_asks_for_fahrenheit_and_mph() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("wind_speed_unit", "mph"))
            .and(query_param_is_missing("precipitation_unit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(springfield_forecast()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ForecastClient::new(&test_config(&server)).unwrap();
        let result = client.fetch(39.78, -89.65, UnitSystem::Imperial).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn missing_current_block_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": springfield_forecast()["daily"].clone()
            })))
            .mount(&server)
            .await;

        let client = ForecastClient::new(&test_config(&server)).unwrap();
        let err = client.fetch(0.0, 0.0, UnitSystem::Metric).await.unwrap_err();

        let weather_core::FetchError::Network(e) = err;
        assert_eq!(e.kind(), NetworkErrorKind::Malformed);
    }

    #[tokio::test]
    async fn bad_request_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": true,
                "reason": "Latitude must be in range of -90 to 90°."
            })))
            .mount(&server)
            .await;

        let client = ForecastClient::new(&test_config(&server)).unwrap();
        let err = client.fetch(91.0, 0.0, UnitSystem::Metric).await.unwrap_err();

        let weather_core::FetchError::Network(e) = err;
        assert_eq!(e.kind(), NetworkErrorKind::Status(400));
    }
}

// =============================================================================
// Pipeline Tests
// =============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn springfield_end_to_end() {
        let server = MockServer::start().await;
        mount_geocoding(&server, springfield_geocoding()).await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "39.78"))
            .and(query_param("longitude", "-89.65"))
            .respond_with(ResponseTemplate::new(200).set_body_json(springfield_forecast()))
            .expect(1)
            .mount(&server)
            .await;

        let pipeline = Pipeline::open_meteo(&test_config(&server)).unwrap();
        let report = pipeline.run("Springfield", UnitSystem::Metric).await.unwrap();

        assert_eq!(report.location.display_name(), "Springfield, Illinois, United States");
        assert_eq!(codes::describe_reported(report.current.weather_code), ("Clear sky", "☀️"));
        assert_eq!(report.daily.len(), 1);
        assert_eq!(codes::describe_reported(report.daily[0].weather_code), ("Overcast", "☁️"));
        assert_eq!(report.daily[0].precipitation_sum, 0.0);
    }

    #[tokio::test]
    async fn null_weather_codes_are_reported_as_unknown() {
        let server = MockServer::start().await;
        mount_geocoding(&server, springfield_geocoding()).await;

        let mut body = springfield_forecast();
        body["current"]["weather_code"] = serde_json::Value::Null;
        body["daily"]["weather_code"] = serde_json::json!([null]);

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let pipeline = Pipeline::open_meteo(&test_config(&server)).unwrap();
        let report = pipeline.run("Springfield", UnitSystem::Metric).await.unwrap();

        assert_eq!(codes::describe_reported(report.current.weather_code), codes::UNKNOWN);
        assert_eq!(codes::describe_reported(report.daily[0].weather_code), codes::UNKNOWN);
    }

    #[tokio::test]
    async fn unknown_city_never_requests_forecast() {
        let server = MockServer::start().await;
        mount_geocoding(&server, serde_json::json!({ "results": [] })).await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(springfield_forecast()))
            .expect(0)
            .mount(&server)
            .await;

        let pipeline = Pipeline::open_meteo(&test_config(&server)).unwrap();
        let err = pipeline.run("Atlantis", UnitSystem::Metric).await.unwrap_err();

        assert!(matches!(err, PipelineError::LocationNotFound { .. }));
    }

    #[tokio::test]
    async fn geocoding_500_aborts_without_forecast() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(springfield_forecast()))
            .expect(0)
            .mount(&server)
            .await;

        let pipeline = Pipeline::open_meteo(&test_config(&server)).unwrap();
        let err = pipeline.run("Springfield", UnitSystem::Metric).await.unwrap_err();

        match err {
            PipelineError::WeatherUnavailable { stage, source } => {
                assert_eq!(stage, Stage::Geocoding);
                assert_eq!(source.kind(), NetworkErrorKind::Status(500));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn forecast_503_is_weather_unavailable() {
        let server = MockServer::start().await;
        mount_geocoding(&server, springfield_geocoding()).await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let pipeline = Pipeline::open_meteo(&test_config(&server)).unwrap();
        let err = pipeline.run("Springfield", UnitSystem::Imperial).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::WeatherUnavailable {
                stage: Stage::Forecast,
                ..
            }
        ));
        assert!(!err.is_connectivity_loss());
    }
}
