//! Live conditions for a single named location

use serde::Serialize;

use shared::{
    Coordinate, ImpactScores, TelemetryError, TelemetryPayload, TelemetryResult, TrafficFlow,
    TrafficIncident, TransportSchedules, WeatherReport,
};

use super::Providers;

/// A place name with its resolved coordinates
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeocodedLocation {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodedLocation {
    fn new(location: &str, at: Coordinate) -> Self {
        Self {
            location: location.to_string(),
            lat: at.latitude,
            lon: at.longitude,
        }
    }
}

/// Everything known about one location
#[derive(Debug, Clone, Serialize)]
pub struct LocationReport {
    pub location: GeocodedLocation,
    pub weather: TelemetryPayload<WeatherReport>,
    pub traffic_incidents: TelemetryPayload<Vec<TrafficIncident>>,
    pub traffic_flow: TelemetryPayload<TrafficFlow>,
    pub schedules: TransportSchedules,
    pub impact: ImpactScores,
}

/// Service answering per-location condition queries
pub struct ConditionsService {
    providers: Providers,
    incident_bbox_delta: f64,
}

impl ConditionsService {
    pub fn new(providers: Providers, incident_bbox_delta: f64) -> Self {
        Self {
            providers,
            incident_bbox_delta,
        }
    }

    /// Resolve a place name
    pub async fn geocode(&self, location: &str) -> TelemetryResult<GeocodedLocation> {
        let at = self.resolve(location).await?;
        Ok(GeocodedLocation::new(location, at))
    }

    pub async fn traffic_flow(&self, location: &str) -> TelemetryResult<TrafficFlow> {
        let at = self.resolve(location).await?;
        self.providers.traffic.traffic_flow(at).await
    }

    pub async fn traffic_incidents(
        &self,
        location: &str,
        incident_type: Option<&str>,
    ) -> TelemetryResult<Vec<TrafficIncident>> {
        let at = self.resolve(location).await?;
        self.incidents_at(at, incident_type).await
    }

    pub async fn weather(&self, location: &str) -> TelemetryResult<WeatherReport> {
        let at = self.resolve(location).await?;
        self.providers.weather.current_weather(at).await
    }

    pub async fn weather_at(&self, at: Coordinate) -> TelemetryResult<WeatherReport> {
        self.providers.weather.current_weather(at).await
    }

    /// Score all three impact factors; only a geocode miss is an error
    pub async fn impact(&self, location: &str) -> TelemetryResult<ImpactScores> {
        let at = self.resolve(location).await?;
        let (weather, flow, incidents) = self.fetch_conditions(at).await;
        Ok(ImpactScores::assess(
            weather.as_ref().ok(),
            flow.as_ref().ok(),
            incidents.as_deref().ok(),
        ))
    }

    /// Aggregate weather, traffic, schedules and impact for a location
    pub async fn all_data(&self, location: &str) -> TelemetryResult<LocationReport> {
        let at = self.resolve(location).await?;
        let (weather, flow, incidents) = self.fetch_conditions(at).await;
        let impact = ImpactScores::assess(
            weather.as_ref().ok(),
            flow.as_ref().ok(),
            incidents.as_deref().ok(),
        );

        Ok(LocationReport {
            location: GeocodedLocation::new(location, at),
            weather: weather.into(),
            traffic_incidents: incidents.into(),
            traffic_flow: flow.into(),
            schedules: TransportSchedules::static_rail(),
            impact,
        })
    }

    /// Any geocoder failure is reported as the place not being found
    async fn resolve(&self, location: &str) -> TelemetryResult<Coordinate> {
        self.providers
            .geocoder
            .geocode(location)
            .await
            .map_err(|_| TelemetryError::GeocodeNotFound(location.to_string()))
    }

    async fn incidents_at(
        &self,
        at: Coordinate,
        incident_type: Option<&str>,
    ) -> TelemetryResult<Vec<TrafficIncident>> {
        let bbox = at.bounding_box(self.incident_bbox_delta);
        self.providers
            .traffic
            .traffic_incidents(bbox, incident_type)
            .await
    }

    async fn fetch_conditions(
        &self,
        at: Coordinate,
    ) -> (
        TelemetryResult<WeatherReport>,
        TelemetryResult<TrafficFlow>,
        TelemetryResult<Vec<TrafficIncident>>,
    ) {
        let weather = self.providers.weather.current_weather(at).await;
        let flow = self.providers.traffic.traffic_flow(at).await;
        let incidents = self.incidents_at(at, None).await;
        (weather, flow, incidents)
    }
}

/// Body returned when a location endpoint cannot resolve its input
pub fn geocode_failure_message(location: &str) -> String {
    format!("Could not geocode location: {}", location)
}

/// Message for a failed location lookup; geocode misses get the friendly text
pub fn lookup_failure_message(location: &str, error: &TelemetryError) -> String {
    match error {
        TelemetryError::GeocodeNotFound(_) => geocode_failure_message(location),
        other => other.to_string(),
    }
}
