//! External API integrations
//!
//! Every client converts transport, status and parse failures into a
//! [`TelemetryError`] at the call site. The traits below are the seams the
//! route planner and handlers depend on.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use shared::{
    BoundingBox, Coordinate, RouteDirections, TelemetryError, TelemetryResult, TrafficFlow,
    TrafficIncident, WeatherReport,
};

pub mod azure_maps;
pub mod geocoding;
pub mod weather;

pub use azure_maps::AzureMapsClient;
pub use geocoding::NominatimClient;
pub use weather::WeatherClient;

/// Resolves a free-text place name to a coordinate
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, location: &str) -> TelemetryResult<Coordinate>;
}

/// Computes driving directions between two points
#[async_trait]
pub trait DirectionsSource: Send + Sync {
    async fn directions(&self, from: Coordinate, to: Coordinate) -> TelemetryResult<RouteDirections>;
}

/// Live traffic flow and incidents
#[async_trait]
pub trait TrafficSource: Send + Sync {
    async fn traffic_flow(&self, at: Coordinate) -> TelemetryResult<TrafficFlow>;

    async fn traffic_incidents(
        &self,
        bbox: BoundingBox,
        incident_type: Option<&str>,
    ) -> TelemetryResult<Vec<TrafficIncident>>;
}

/// Current weather conditions
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_weather(&self, at: Coordinate) -> TelemetryResult<WeatherReport>;
}

/// Build the HTTP client shared by one upstream integration
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Send a request and decode its JSON body, logging any failure
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    service: &'static str,
) -> TelemetryResult<T> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!("{} request failed: {}", service, e);
        TelemetryError::RequestFailed(format!("{} request failed: {}", service, e))
    })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("{} returned {}: {}", service, status, body);
        return Err(TelemetryError::RequestFailed(format!(
            "{} error: {}",
            service, status
        )));
    }

    response.json::<T>().await.map_err(|e| {
        tracing::warn!("Failed to parse {} response: {}", service, e);
        TelemetryError::MalformedResponse(format!("{}: {}", service, e))
    })
}
