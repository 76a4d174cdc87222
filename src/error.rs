//! Error types for the itinerary pipeline.

use thiserror::Error;

/// Failure of one call to an external routing service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{service} responded with status {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("malformed {service} response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("expected {expected} travel times, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("{0} is not supported by this provider")]
    Unsupported(&'static str),
}

impl ServiceError {
    pub(crate) fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        ServiceError::MalformedResponse {
            service,
            reason: reason.into(),
        }
    }
}

/// Rejected value from the origin latitude/longitude fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("environment variable {name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("unknown provider {0:?}, expected tomtom, osrm or haversine")]
    UnknownProvider(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Input(#[from] InputError),
}

/// A pipeline run that was abandoned. The map keeps its last rendered route.
#[derive(Debug, Error)]
#[error("pipeline run {generation} abandoned: {source}")]
pub struct PipelineError {
    pub generation: u64,
    #[source]
    pub source: ServiceError,
}
