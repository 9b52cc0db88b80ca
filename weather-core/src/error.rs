use std::fmt;

use thiserror::Error;

/// How a request to a remote service went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// No connection could be established (DNS, refused, no route).
    Unreachable,
    Timeout,
    /// The service answered with a non-success HTTP status.
    Status(u16),
    /// The body could not be read or did not match the expected shape.
    Malformed,
    /// The request failed before reaching the network, e.g. an unusable URL.
    Request,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkErrorKind::Unreachable => f.write_str("service unreachable"),
            NetworkErrorKind::Timeout => f.write_str("request timed out"),
            NetworkErrorKind::Status(code) => write!(f, "HTTP status {code}"),
            NetworkErrorKind::Malformed => f.write_str("malformed response"),
            NetworkErrorKind::Request => f.write_str("request could not be sent"),
        }
    }
}

/// Any transport-level failure, reduced to a kind and a short diagnostic.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct NetworkError {
    kind: NetworkErrorKind,
    message: String,
}

impl NetworkError {
    pub fn new(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(NetworkErrorKind::Malformed, message)
    }

    pub fn kind(&self) -> NetworkErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the failure means there is no usable network path at all.
    pub fn is_unreachable(&self) -> bool {
        self.kind == NetworkErrorKind::Unreachable
    }

    /// Classify a `reqwest` failure that happened before a status was known.
    ///
    /// Only connect failures count as [`NetworkErrorKind::Unreachable`].
    pub(crate) fn from_transport(service: &str, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if err.is_connect() {
            NetworkErrorKind::Unreachable
        } else if err.is_decode() || err.is_body() {
            NetworkErrorKind::Malformed
        } else if let Some(status) = err.status() {
            NetworkErrorKind::Status(status.as_u16())
        } else {
            NetworkErrorKind::Request
        };

        Self::new(kind, format!("{service} request failed: {err}"))
    }
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("no location matches '{0}'")]
    NotFound(String),

    #[error("geocoding failed: {0}")]
    Network(#[from] NetworkError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("forecast retrieval failed: {0}")]
    Network(#[from] NetworkError),
}

/// Which pipeline step produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocoding,
    Forecast,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Geocoding => f.write_str("geocoding"),
            Stage::Forecast => f.write_str("forecast"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not find '{place}'")]
    LocationNotFound { place: String },

    #[error("weather unavailable ({stage}): {source}")]
    WeatherUnavailable {
        stage: Stage,
        #[source]
        source: NetworkError,
    },
}

impl PipelineError {
    /// The underlying network failure, if any.
    pub fn network(&self) -> Option<&NetworkError> {
        match self {
            PipelineError::LocationNotFound { .. } => None,
            PipelineError::WeatherUnavailable { source, .. } => Some(source),
        }
    }

    /// True when the run failed because the machine has no connectivity.
    pub fn is_connectivity_loss(&self) -> bool {
        self.network().is_some_and(NetworkError::is_unreachable)
    }
}

impl From<GeoError> for PipelineError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::NotFound(place) => PipelineError::LocationNotFound { place },
            GeoError::Network(source) => PipelineError::WeatherUnavailable {
                stage: Stage::Geocoding,
                source,
            },
        }
    }
}

impl From<FetchError> for PipelineError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(source) => PipelineError::WeatherUnavailable {
                stage: Stage::Forecast,
                source,
            },
        }
    }
}
