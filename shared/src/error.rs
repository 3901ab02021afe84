//! Failure kinds reported by the external data adapters

use thiserror::Error;

/// Why an external lookup produced no usable record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TelemetryError {
    #[error("No results found for {0}")]
    GeocodeNotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("No route found")]
    NoRouteFound,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No {0} data available for this location")]
    NoData(&'static str),

    #[error("Missing API credentials for {0}")]
    MissingCredentials(&'static str),
}

/// Result of a single external telemetry call
pub type TelemetryResult<T> = Result<T, TelemetryError>;
