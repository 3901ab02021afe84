//! Multi-stop route planning
//!
//! Legs are planned strictly in waypoint order, one upstream call at a time.
//! A leg that fails is reported in place and never aborts the rest of the
//! route.

use std::collections::HashMap;
use thiserror::Error;

use shared::{
    format_eta, suggest_rerouting, Coordinate, ImpactScores, OptimizedRoute, PlannedLeg,
    RouteLeg, TelemetryError, TelemetryResult, TrafficFlow, WeatherReport, GEOCODING_FAILED,
};

use super::Providers;

/// Why a point-to-point route could not be produced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutePlanError {
    #[error("Unable to geocode one or both locations.")]
    Geocoding,

    #[error("Routing failed: {0}")]
    Routing(TelemetryError),
}

/// Traffic and weather fetched once for a waypoint
#[derive(Debug, Clone)]
struct PlaceConditions {
    traffic: TelemetryResult<TrafficFlow>,
    weather: TelemetryResult<WeatherReport>,
}

impl PlaceConditions {
    fn unresolved(name: &str) -> Self {
        let error = TelemetryError::GeocodeNotFound(name.to_string());
        Self {
            traffic: Err(error.clone()),
            weather: Err(error),
        }
    }
}

/// Plans routes against the configured providers
pub struct RoutePlanner {
    providers: Providers,
    incident_bbox_delta: f64,
}

impl RoutePlanner {
    pub fn new(providers: Providers, incident_bbox_delta: f64) -> Self {
        Self {
            providers,
            incident_bbox_delta,
        }
    }

    /// Plan one leg per consecutive pair of waypoints
    pub async fn plan_legs(&self, waypoints: &[String]) -> Vec<RouteLeg> {
        if waypoints.len() < 2 {
            return Vec::new();
        }

        tracing::info!("Planning {} legs", waypoints.len() - 1);
        let conditions = self.collect_conditions(waypoints).await;

        let mut legs = Vec::with_capacity(waypoints.len() - 1);
        for pair in waypoints.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let start = conditions
                .get(from)
                .cloned()
                .unwrap_or_else(|| PlaceConditions::unresolved(from));
            legs.push(self.plan_leg(from, to, start).await);
        }
        legs
    }

    async fn collect_conditions(&self, waypoints: &[String]) -> HashMap<String, PlaceConditions> {
        let mut conditions = HashMap::new();
        for name in waypoints {
            if conditions.contains_key(name) {
                continue;
            }
            let place = match self.providers.geocoder.geocode(name).await {
                Ok(at) => PlaceConditions {
                    traffic: self.providers.traffic.traffic_flow(at).await,
                    weather: self.providers.weather.current_weather(at).await,
                },
                Err(e) => {
                    tracing::warn!("No conditions for {:?}: {}", name, e);
                    PlaceConditions::unresolved(name)
                }
            };
            conditions.insert(name.clone(), place);
        }
        conditions
    }

    async fn plan_leg(&self, from: &str, to: &str, start: PlaceConditions) -> RouteLeg {
        let origin = self.providers.geocoder.geocode(from).await;
        let destination = self.providers.geocoder.geocode(to).await;
        let (origin, destination) = match (origin, destination) {
            (Ok(origin), Ok(destination)) => (origin, destination),
            _ => {
                tracing::warn!("Leg {} -> {}: geocoding failed", from, to);
                return RouteLeg::failed(from, to, GEOCODING_FAILED);
            }
        };

        let directions = match self.providers.directions.directions(origin, destination).await {
            Ok(directions) => directions,
            Err(e) => {
                tracing::warn!("Leg {} -> {}: {}", from, to, e);
                return RouteLeg::failed(from, to, RoutePlanError::Routing(e).to_string());
            }
        };

        let eta_seconds = directions.summary.eta_seconds();
        tracing::debug!("Leg {} -> {} planned, eta {}s", from, to, eta_seconds);

        let reroute_advice = suggest_rerouting(start.traffic.as_ref().ok(), start.weather.as_ref().ok());
        RouteLeg::Planned(PlannedLeg {
            from: from.to_string(),
            to: to.to_string(),
            path: directions.path,
            eta_seconds,
            eta: format_eta(eta_seconds),
            distance_km: directions.summary.distance_km(),
            traffic: start.traffic,
            weather: start.weather,
            reroute_advice,
        })
    }

    /// Route directly between two places with the start point's conditions
    pub async fn optimized_route(
        &self,
        start: &str,
        end: &str,
    ) -> Result<OptimizedRoute, RoutePlanError> {
        let origin = self.providers.geocoder.geocode(start).await;
        let destination = self.providers.geocoder.geocode(end).await;
        let (origin, destination) = match (origin, destination) {
            (Ok(origin), Ok(destination)) => (origin, destination),
            _ => return Err(RoutePlanError::Geocoding),
        };

        let directions = self
            .providers
            .directions
            .directions(origin, destination)
            .await
            .map_err(RoutePlanError::Routing)?;

        let traffic_info = self.providers.traffic.traffic_flow(origin).await;
        let weather_info = self.providers.weather.current_weather(origin).await;
        let traffic_incidents = self
            .providers
            .traffic
            .traffic_incidents(self.incident_box(origin), None)
            .await;

        let impact = ImpactScores::assess(
            weather_info.as_ref().ok(),
            traffic_info.as_ref().ok(),
            traffic_incidents.as_deref().ok(),
        );
        let reroute_advice = suggest_rerouting(traffic_info.as_ref().ok(), weather_info.as_ref().ok());
        let eta_seconds = directions.summary.eta_seconds();

        Ok(OptimizedRoute {
            route: directions.path,
            eta_seconds,
            eta: format_eta(eta_seconds),
            distance_km: directions.summary.distance_km(),
            traffic_info,
            weather_info,
            traffic_incidents,
            impact,
            reroute_advice,
        })
    }

    fn incident_box(&self, at: Coordinate) -> shared::BoundingBox {
        at.bounding_box(self.incident_bbox_delta)
    }
}
