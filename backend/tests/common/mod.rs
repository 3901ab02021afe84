//! In-memory providers for exercising services and routes without network access

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mail_routing_backend::external::{DirectionsSource, Geocoder, TrafficSource, WeatherSource};
use mail_routing_backend::Providers;
use shared::{
    BoundingBox, CongestionLevel, Coordinate, RouteDirections, RouteSummary, TelemetryError,
    TelemetryResult, TrafficFlow, TrafficIncident, WeatherReport, WeatherRisk,
};

/// A scripted world of known places and conditions
pub struct FakeWorld {
    places: HashMap<String, Coordinate>,
    summary: RouteSummary,
    routing_error: Option<TelemetryError>,
    speeds: Option<(f64, f64)>,
    condition: Option<String>,
    incidents: Vec<TrafficIncident>,
    geocode_calls: Mutex<Vec<String>>,
    directions_calls: Mutex<Vec<(Coordinate, Coordinate)>>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self {
            places: HashMap::new(),
            summary: RouteSummary {
                travel_time_seconds: 3600,
                traffic_delay_seconds: 300,
                length_meters: 150_000.0,
            },
            routing_error: None,
            speeds: None,
            condition: None,
            incidents: Vec::new(),
            geocode_calls: Mutex::new(Vec::new()),
            directions_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_place(mut self, name: &str, lat: f64, lon: f64) -> Self {
        self.places.insert(name.to_string(), Coordinate::new(lat, lon));
        self
    }

    pub fn with_summary(mut self, travel: u64, delay: u64, meters: f64) -> Self {
        self.summary = RouteSummary {
            travel_time_seconds: travel,
            traffic_delay_seconds: delay,
            length_meters: meters,
        };
        self
    }

    pub fn with_routing_error(mut self, error: TelemetryError) -> Self {
        self.routing_error = Some(error);
        self
    }

    pub fn with_traffic(mut self, current_kmh: f64, free_flow_kmh: f64) -> Self {
        self.speeds = Some((current_kmh, free_flow_kmh));
        self
    }

    pub fn with_weather(mut self, condition: &str) -> Self {
        self.condition = Some(condition.to_string());
        self
    }

    pub fn with_incident(mut self, incident: TrafficIncident) -> Self {
        self.incidents.push(incident);
        self
    }

    pub fn geocode_count(&self, name: &str) -> usize {
        self.geocode_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.as_str() == name)
            .count()
    }

    pub fn directions_count(&self) -> usize {
        self.directions_calls.lock().unwrap().len()
    }

    pub fn providers(world: &Arc<FakeWorld>) -> Providers {
        Providers {
            geocoder: world.clone(),
            directions: world.clone(),
            traffic: world.clone(),
            weather: world.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for FakeWorld {
    async fn geocode(&self, location: &str) -> TelemetryResult<Coordinate> {
        self.geocode_calls.lock().unwrap().push(location.to_string());
        self.places
            .get(location)
            .copied()
            .ok_or_else(|| TelemetryError::GeocodeNotFound(location.to_string()))
    }
}

#[async_trait]
impl DirectionsSource for FakeWorld {
    async fn directions(&self, from: Coordinate, to: Coordinate) -> TelemetryResult<RouteDirections> {
        self.directions_calls.lock().unwrap().push((from, to));
        if let Some(error) = &self.routing_error {
            return Err(error.clone());
        }
        Ok(RouteDirections {
            summary: self.summary,
            path: vec![from, to],
        })
    }
}

#[async_trait]
impl TrafficSource for FakeWorld {
    async fn traffic_flow(&self, at: Coordinate) -> TelemetryResult<TrafficFlow> {
        let (current, free_flow) = self.speeds.ok_or(TelemetryError::NoData("traffic flow"))?;
        Ok(TrafficFlow {
            location: at,
            current_speed_kmh: current,
            free_flow_speed_kmh: free_flow,
            congestion_level: CongestionLevel::from_speeds(current, free_flow),
            confidence: Some(0.9),
            road_closure: false,
        })
    }

    async fn traffic_incidents(
        &self,
        _bbox: BoundingBox,
        incident_type: Option<&str>,
    ) -> TelemetryResult<Vec<TrafficIncident>> {
        Ok(self
            .incidents
            .iter()
            .filter(|i| incident_type.is_none() || i.incident_type.as_deref() == incident_type)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WeatherSource for FakeWorld {
    async fn current_weather(&self, at: Coordinate) -> TelemetryResult<WeatherReport> {
        let condition = self
            .condition
            .clone()
            .ok_or(TelemetryError::MissingCredentials("OpenWeather"))?;
        Ok(WeatherReport {
            location: at,
            risk: WeatherRisk::from_condition(&condition),
            condition,
            temperature_c: Some(27.0),
            wind_speed_kmh: Some(12.6),
            wind_direction: Some("W".to_string()),
        })
    }
}

/// The Mumbai/Pune corridor used across tests
pub fn mumbai_pune() -> FakeWorld {
    FakeWorld::new()
        .with_place("Mumbai", 19.076, 72.8777)
        .with_place("Pune", 18.5204, 73.8567)
        .with_place("Lonavala", 18.7546, 73.4062)
}
