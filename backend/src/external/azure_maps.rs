//! Azure Maps client for traffic flow, traffic incidents and route directions

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use shared::{
    BoundingBox, CongestionLevel, Coordinate, RouteDirections, RouteSummary, TelemetryError,
    TelemetryResult, TrafficFlow, TrafficIncident,
};

use super::{fetch_json, DirectionsSource, TrafficSource};

const SERVICE: &str = "Azure Maps";

/// Azure Maps API client
#[derive(Clone)]
pub struct AzureMapsClient {
    client: Client,
    subscription_key: String,
    base_url: String,
    travel_mode: String,
    traffic_zoom: u8,
}

/// Traffic flow segment response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowResponse {
    flow_segment_data: Option<FlowSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowSegment {
    #[serde(default)]
    current_speed: f64,
    #[serde(default)]
    free_flow_speed: f64,
    confidence: Option<f64>,
    #[serde(default)]
    road_closure: bool,
}

/// Traffic incident response (GeoJSON feature collection)
#[derive(Debug, Deserialize)]
struct IncidentResponse {
    #[serde(default)]
    features: Vec<IncidentFeature>,
}

#[derive(Debug, Deserialize)]
struct IncidentFeature {
    #[serde(default)]
    geometry: Option<IncidentGeometry>,
    #[serde(default)]
    properties: IncidentProperties,
}

#[derive(Debug, Default, Deserialize)]
struct IncidentGeometry {
    #[serde(default)]
    coordinates: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncidentProperties {
    incident_type: Option<String>,
    title: Option<String>,
    description: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    severity: Option<String>,
    #[serde(default)]
    is_road_closed: Option<bool>,
    #[serde(default)]
    is_traffic_jam: Option<bool>,
    delay: Option<f64>,
    end_point: Option<IncidentGeometry>,
}

/// Route directions response
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    summary: DirectionsSummary,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectionsSummary {
    #[serde(default)]
    length_in_meters: f64,
    #[serde(default)]
    travel_time_in_seconds: u64,
    #[serde(default)]
    traffic_delay_in_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    points: Vec<DirectionsPoint>,
}

#[derive(Debug, Deserialize)]
struct DirectionsPoint {
    latitude: f64,
    longitude: f64,
}

/// Severity arrives as a label or a numeric magnitude depending on API version
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl AzureMapsClient {
    /// Create a new AzureMapsClient
    pub fn new(client: Client, subscription_key: String, travel_mode: String, traffic_zoom: u8) -> Self {
        Self::with_base_url(
            client,
            subscription_key,
            travel_mode,
            traffic_zoom,
            "https://atlas.microsoft.com".to_string(),
        )
    }

    /// Create a new AzureMapsClient with custom base URL (for testing)
    pub fn with_base_url(
        client: Client,
        subscription_key: String,
        travel_mode: String,
        traffic_zoom: u8,
        base_url: String,
    ) -> Self {
        Self {
            client,
            subscription_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            travel_mode,
            traffic_zoom,
        }
    }

    fn require_key(&self) -> TelemetryResult<&str> {
        if self.subscription_key.is_empty() {
            tracing::warn!("AZURE_MAPS subscription key is not set");
            return Err(TelemetryError::MissingCredentials(SERVICE));
        }
        Ok(&self.subscription_key)
    }

    fn convert_flow(at: Coordinate, data: FlowResponse) -> TelemetryResult<TrafficFlow> {
        let segment = data
            .flow_segment_data
            .ok_or(TelemetryError::NoData("traffic flow"))?;

        Ok(TrafficFlow {
            location: at,
            current_speed_kmh: segment.current_speed,
            free_flow_speed_kmh: segment.free_flow_speed,
            congestion_level: CongestionLevel::from_speeds(
                segment.current_speed,
                segment.free_flow_speed,
            ),
            confidence: segment.confidence,
            road_closure: segment.road_closure,
        })
    }

    fn convert_incidents(data: IncidentResponse) -> Vec<TrafficIncident> {
        data.features
            .into_iter()
            .map(|feature| {
                let props = feature.properties;
                TrafficIncident {
                    location: feature.geometry.map(|g| g.coordinates).unwrap_or_default(),
                    incident_type: props.incident_type,
                    title: props.title,
                    description: props.description,
                    start_time: props.start_time,
                    end_time: props.end_time,
                    severity: props.severity,
                    is_road_closed: props.is_road_closed.unwrap_or(false),
                    is_traffic_jam: props.is_traffic_jam.unwrap_or(false),
                    delay: props.delay,
                    end_point: props.end_point.map(|g| g.coordinates).unwrap_or_default(),
                }
            })
            .collect()
    }

    fn convert_directions(data: DirectionsResponse) -> TelemetryResult<RouteDirections> {
        let route = data
            .routes
            .into_iter()
            .next()
            .ok_or(TelemetryError::NoRouteFound)?;

        let path = route
            .legs
            .into_iter()
            .next()
            .map(|leg| {
                leg.points
                    .into_iter()
                    .map(|p| Coordinate::new(p.latitude, p.longitude))
                    .collect()
            })
            .unwrap_or_default();

        if route
            .summary
            .travel_time_in_seconds
            .checked_add(route.summary.traffic_delay_in_seconds)
            .is_none()
        {
            return Err(TelemetryError::MalformedResponse(
                "Azure Maps directions: travel time overflows".to_string(),
            ));
        }

        Ok(RouteDirections {
            summary: RouteSummary {
                travel_time_seconds: route.summary.travel_time_in_seconds,
                traffic_delay_seconds: route.summary.traffic_delay_in_seconds,
                length_meters: route.summary.length_in_meters,
            },
            path,
        })
    }
}

#[async_trait]
impl TrafficSource for AzureMapsClient {
    async fn traffic_flow(&self, at: Coordinate) -> TelemetryResult<TrafficFlow> {
        let key = self.require_key()?;
        let query = format!("{},{}", at.latitude, at.longitude);
        let zoom = self.traffic_zoom.to_string();

        let request = self
            .client
            .get(format!("{}/traffic/flow/segment/json", self.base_url))
            .query(&[
                ("api-version", "1.0"),
                ("subscription-key", key),
                ("query", query.as_str()),
                ("zoom", zoom.as_str()),
                ("style", "relative"),
            ]);

        let data: FlowResponse = fetch_json(request, SERVICE).await?;
        Self::convert_flow(at, data)
    }

    async fn traffic_incidents(
        &self,
        bbox: BoundingBox,
        incident_type: Option<&str>,
    ) -> TelemetryResult<Vec<TrafficIncident>> {
        let key = self.require_key()?;
        let bbox_param = bbox.to_query_param();

        let mut params = vec![
            ("api-version", "2025-01-01"),
            ("bbox", bbox_param.as_str()),
            ("subscription-key", key),
        ];
        if let Some(kind) = incident_type {
            params.push(("incidentType", kind));
        }

        let request = self
            .client
            .get(format!("{}/traffic/incident", self.base_url))
            .query(&params);

        let data: IncidentResponse = fetch_json(request, SERVICE).await?;
        Ok(Self::convert_incidents(data))
    }
}

#[async_trait]
impl DirectionsSource for AzureMapsClient {
    async fn directions(&self, from: Coordinate, to: Coordinate) -> TelemetryResult<RouteDirections> {
        let key = self.require_key()?;
        let query = format!(
            "{},{}:{},{}",
            from.latitude, from.longitude, to.latitude, to.longitude
        );

        let request = self
            .client
            .get(format!("{}/route/directions/json", self.base_url))
            .query(&[
                ("api-version", "1.0"),
                ("subscription-key", key),
                ("query", query.as_str()),
                ("travelMode", self.travel_mode.as_str()),
                ("routeType", "fastest"),
                ("computeTravelTimeFor", "all"),
                ("traffic", "true"),
            ]);

        let data: DirectionsResponse = fetch_json(request, SERVICE).await?;
        Self::convert_directions(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_flow_segment() {
        let data: FlowResponse = serde_json::from_str(
            r#"{"flowSegmentData": {"frc": "FRC2", "currentSpeed": 40, "freeFlowSpeed": 100,
                "confidence": 0.95, "roadClosure": false}}"#,
        )
        .unwrap();
        let at = Coordinate::new(19.07, 72.87);
        let flow = AzureMapsClient::convert_flow(at, data).unwrap();
        assert_eq!(flow.current_speed_kmh, 40.0);
        assert_eq!(flow.free_flow_speed_kmh, 100.0);
        assert_eq!(flow.congestion_level, CongestionLevel::High);
        assert_eq!(flow.confidence, Some(0.95));
        assert_eq!(flow.location, at);
    }

    #[test]
    fn test_convert_flow_without_segment() {
        let data: FlowResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(
            AzureMapsClient::convert_flow(Coordinate::new(0.0, 0.0), data),
            Err(TelemetryError::NoData("traffic flow"))
        );
    }

    #[test]
    fn test_convert_incidents() {
        let data: IncidentResponse = serde_json::from_str(
            r#"{"type": "FeatureCollection", "features": [
                {"geometry": {"type": "Point", "coordinates": [72.8, 19.0]},
                 "properties": {"incidentType": "Accident", "title": "Crash on WEH",
                   "severity": "Major", "isRoadClosed": false, "isTrafficJam": true,
                   "delay": 420, "endPoint": {"coordinates": [72.9, 19.1]}}},
                {"geometry": {"type": "Point", "coordinates": [72.7, 19.2]},
                 "properties": {"incidentType": "Construction", "severity": 3}}
            ]}"#,
        )
        .unwrap();
        let incidents = AzureMapsClient::convert_incidents(data);
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].title.as_deref(), Some("Crash on WEH"));
        assert!(incidents[0].is_traffic_jam);
        assert_eq!(incidents[0].delay, Some(420.0));
        assert_eq!(incidents[0].end_point.len(), 2);
        assert_eq!(incidents[1].severity.as_deref(), Some("3"));
        assert!(!incidents[1].is_road_closed);
    }

    #[test]
    fn test_convert_directions() {
        let data: DirectionsResponse = serde_json::from_str(
            r#"{"routes": [{"summary": {"lengthInMeters": 150000, "travelTimeInSeconds": 3600,
                  "trafficDelayInSeconds": 300},
                "legs": [{"points": [{"latitude": 19.07, "longitude": 72.87},
                                     {"latitude": 18.52, "longitude": 73.85}]}]}]}"#,
        )
        .unwrap();
        let directions = AzureMapsClient::convert_directions(data).unwrap();
        assert_eq!(directions.summary.eta_seconds(), 3900);
        assert_eq!(directions.summary.distance_km(), 150.0);
        assert_eq!(directions.path.len(), 2);
        assert_eq!(directions.path[1], Coordinate::new(18.52, 73.85));
    }

    #[test]
    fn test_convert_directions_without_routes() {
        let data: DirectionsResponse = serde_json::from_str(r#"{"routes": []}"#).unwrap();
        assert_eq!(
            AzureMapsClient::convert_directions(data),
            Err(TelemetryError::NoRouteFound)
        );
    }

    #[test]
    fn test_convert_directions_rejects_overflowing_times() {
        let data: DirectionsResponse = serde_json::from_str(
            r#"{"routes": [{"summary": {"lengthInMeters": 1000,
                  "travelTimeInSeconds": 18446744073709551615, "trafficDelayInSeconds": 1},
                "legs": []}]}"#,
        )
        .unwrap();
        assert!(matches!(
            AzureMapsClient::convert_directions(data),
            Err(TelemetryError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let client = AzureMapsClient::with_base_url(
            Client::new(),
            String::new(),
            "car".to_string(),
            10,
            "http://127.0.0.1:9".to_string(),
        );
        let result = client
            .directions(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .await;
        assert_eq!(result, Err(TelemetryError::MissingCredentials("Azure Maps")));
    }
}
