//! Upstream client tests
//!
//! Runs the real HTTP clients against a local axum server that mimics the
//! Nominatim, Azure Maps and OpenWeather endpoints.

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use mail_routing_backend::external::{
    http_client, AzureMapsClient, DirectionsSource, Geocoder, NominatimClient, TrafficSource,
    WeatherClient, WeatherSource,
};
use shared::{CongestionLevel, Coordinate, TelemetryError, WeatherRisk};

type Params = Query<HashMap<String, String>>;

async fn search(headers: HeaderMap, Query(params): Params) -> (StatusCode, Json<Value>) {
    if !headers.contains_key("user-agent") {
        return (StatusCode::FORBIDDEN, Json(json!([])));
    }
    let body = match params.get("q").map(String::as_str) {
        Some("Pune") => json!([{ "lat": "18.5204", "lon": "73.8567", "display_name": "Pune" }]),
        _ => json!([]),
    };
    (StatusCode::OK, Json(body))
}

async fn flow_segment(Query(params): Params) -> (StatusCode, Json<Value>) {
    if params.get("subscription-key").map(String::as_str) != Some("azure-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
    }
    let body = match params.get("query").map(String::as_str) {
        Some("18.5204,73.8567") => json!({
            "flowSegmentData": {
                "currentSpeed": 20, "freeFlowSpeed": 60, "confidence": 0.8, "roadClosure": false
            }
        }),
        _ => json!({}),
    };
    (StatusCode::OK, Json(body))
}

async fn incidents(Query(params): Params) -> Json<Value> {
    let mut features = vec![json!({
        "geometry": { "type": "Point", "coordinates": [73.85, 18.52] },
        "properties": { "incidentType": "Accident", "severity": 3, "isTrafficJam": true }
    })];
    if params.get("incidentType").is_none() {
        features.push(json!({
            "geometry": { "type": "Point", "coordinates": [73.9, 18.6] },
            "properties": { "incidentType": "RoadClosed", "severity": "major", "isRoadClosed": true }
        }));
    }
    Json(json!({ "type": "FeatureCollection", "features": features }))
}

async fn directions(Query(params): Params) -> Json<Value> {
    if params.get("query").map(String::as_str) == Some("0,0:0,0") {
        return Json(json!({ "routes": [] }));
    }
    Json(json!({
        "routes": [{
            "summary": {
                "lengthInMeters": 150000, "travelTimeInSeconds": 3600, "trafficDelayInSeconds": 300
            },
            "legs": [{ "points": [
                { "latitude": 19.076, "longitude": 72.8777 },
                { "latitude": 18.5204, "longitude": 73.8567 }
            ] }]
        }]
    }))
}

async fn weather(Query(params): Params) -> (StatusCode, Json<Value>) {
    if params.get("units").map(String::as_str) != Some("metric") {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "weather": [{ "main": "Thunderstorm", "description": "thunderstorm with rain" }],
            "main": { "temp": 26.1 },
            "wind": { "speed": 10.0, "deg": 90 }
        })),
    )
}

async fn upstream() -> String {
    let app = Router::new()
        .route("/search", get(search))
        .route("/traffic/flow/segment/json", get(flow_segment))
        .route("/traffic/incident", get(incidents))
        .route("/route/directions/json", get(directions))
        .route("/weather", get(weather));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    http_client(Duration::from_secs(5)).unwrap()
}

fn azure(base_url: String, key: &str) -> AzureMapsClient {
    AzureMapsClient::with_base_url(client(), key.to_string(), "car".to_string(), 10, base_url)
}

const PUNE: Coordinate = Coordinate {
    latitude: 18.5204,
    longitude: 73.8567,
};

#[tokio::test]
async fn test_nominatim_geocoding() {
    let base = upstream().await;
    let geocoder = NominatimClient::with_base_url(client(), "mail-route-tests".to_string(), base);

    assert_eq!(geocoder.geocode("Pune").await, Ok(PUNE));
    assert_eq!(
        geocoder.geocode("Atlantis").await,
        Err(TelemetryError::GeocodeNotFound("Atlantis".to_string()))
    );
}

#[tokio::test]
async fn test_azure_traffic_flow() {
    let base = upstream().await;
    let flow = azure(base.clone(), "azure-key").traffic_flow(PUNE).await.unwrap();
    assert_eq!(flow.current_speed_kmh, 20.0);
    assert_eq!(flow.congestion_level, CongestionLevel::High);
    assert_eq!(flow.confidence, Some(0.8));

    let missing = azure(base.clone(), "azure-key")
        .traffic_flow(Coordinate::new(1.0, 1.0))
        .await;
    assert_eq!(missing, Err(TelemetryError::NoData("traffic flow")));

    let rejected = azure(base, "wrong-key").traffic_flow(PUNE).await;
    assert!(matches!(rejected, Err(TelemetryError::RequestFailed(_))));
}

#[tokio::test]
async fn test_azure_incidents() {
    let base = upstream().await;
    let client = azure(base, "azure-key");
    let bbox = PUNE.bounding_box(0.5);

    let all = client.traffic_incidents(bbox, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].severity.as_deref(), Some("3"));
    assert!(all[0].is_traffic_jam);
    assert!(all[1].is_road_closed);
    assert_eq!(all[1].location.len(), 2);

    let accidents = client.traffic_incidents(bbox, Some("Accident")).await.unwrap();
    assert_eq!(accidents.len(), 1);
}

#[tokio::test]
async fn test_azure_directions() {
    let base = upstream().await;
    let client = azure(base, "azure-key");

    let route = client
        .directions(Coordinate::new(19.076, 72.8777), PUNE)
        .await
        .unwrap();
    assert_eq!(route.summary.eta_seconds(), 3900);
    assert_eq!(route.summary.distance_km(), 150.0);
    assert_eq!(route.path.last(), Some(&PUNE));

    let origin = Coordinate::new(0.0, 0.0);
    assert_eq!(
        client.directions(origin, origin).await,
        Err(TelemetryError::NoRouteFound)
    );
}

#[tokio::test]
async fn test_openweather_current() {
    let base = upstream().await;
    let client = WeatherClient::with_base_url(client(), "owm-key".to_string(), base.clone());

    let report = client.current_weather(PUNE).await.unwrap();
    assert_eq!(report.condition, "Thunderstorm");
    assert_eq!(report.risk, WeatherRisk::High);
    assert_eq!(report.wind_speed_kmh, Some(36.0));
    assert_eq!(report.wind_direction.as_deref(), Some("E"));

    let unconfigured = WeatherClient::with_base_url(reqwest::Client::new(), String::new(), base);
    assert_eq!(
        unconfigured.current_weather(PUNE).await,
        Err(TelemetryError::MissingCredentials("OpenWeather"))
    );
}

#[tokio::test]
async fn test_unreachable_upstream_is_request_failure() {
    let geocoder = NominatimClient::with_base_url(
        client(),
        "mail-route-tests".to_string(),
        "http://127.0.0.1:1".to_string(),
    );
    assert!(matches!(
        geocoder.geocode("Pune").await,
        Err(TelemetryError::RequestFailed(_))
    ));
}
