//! Planned route legs and directions summaries

use serde::{Deserialize, Serialize};

use crate::error::TelemetryResult;
use crate::impact::{ImpactScores, RerouteAdvice};
use crate::models::telemetry::{serialize_telemetry, TrafficFlow, TrafficIncident, WeatherReport};
use crate::types::Coordinate;

/// Error text for a leg whose endpoints could not be resolved
pub const GEOCODING_FAILED: &str = "Geocoding failed";

/// Summary returned by the route-directions service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RouteSummary {
    pub travel_time_seconds: u64,
    pub traffic_delay_seconds: u64,
    pub length_meters: f64,
}

impl RouteSummary {
    /// Travel time including the live traffic delay, capped at `u64::MAX`
    pub fn eta_seconds(&self) -> u64 {
        self.travel_time_seconds
            .saturating_add(self.traffic_delay_seconds)
    }

    /// Length in kilometres, rounded to two decimals
    pub fn distance_km(&self) -> f64 {
        (self.length_meters / 1000.0 * 100.0).round() / 100.0
    }
}

/// Directions between two points
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteDirections {
    pub summary: RouteSummary,
    pub path: Vec<Coordinate>,
}

/// Render seconds as `"2 hours, 5 min"` or `"45 min"`
pub fn format_eta(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    if hours > 0 {
        let plural = if hours != 1 { "s" } else { "" };
        format!("{} hour{}, {} min", hours, plural, minutes)
    } else {
        format!("{} min", minutes)
    }
}

/// A leg that was routed successfully
#[derive(Debug, Clone, Serialize)]
pub struct PlannedLeg {
    pub from: String,
    pub to: String,
    pub path: Vec<Coordinate>,
    pub eta_seconds: u64,
    pub eta: String,
    pub distance_km: f64,
    #[serde(serialize_with = "serialize_telemetry")]
    pub traffic: TelemetryResult<TrafficFlow>,
    #[serde(serialize_with = "serialize_telemetry")]
    pub weather: TelemetryResult<WeatherReport>,
    pub reroute_advice: RerouteAdvice,
}

/// A leg that could not be planned
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailedLeg {
    pub from: String,
    pub to: String,
    pub error: String,
}

/// One hop between two consecutive waypoints
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RouteLeg {
    Planned(PlannedLeg),
    Failed(FailedLeg),
}

impl RouteLeg {
    pub fn failed(from: &str, to: &str, error: impl Into<String>) -> Self {
        RouteLeg::Failed(FailedLeg {
            from: from.to_string(),
            to: to.to_string(),
            error: error.into(),
        })
    }

    pub fn from(&self) -> &str {
        match self {
            RouteLeg::Planned(leg) => &leg.from,
            RouteLeg::Failed(leg) => &leg.from,
        }
    }

    pub fn to(&self) -> &str {
        match self {
            RouteLeg::Planned(leg) => &leg.to,
            RouteLeg::Failed(leg) => &leg.to,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RouteLeg::Planned(_) => None,
            RouteLeg::Failed(leg) => Some(&leg.error),
        }
    }

    pub fn as_planned(&self) -> Option<&PlannedLeg> {
        match self {
            RouteLeg::Planned(leg) => Some(leg),
            RouteLeg::Failed(_) => None,
        }
    }
}

/// Point-to-point route with the start point's conditions
#[derive(Debug, Clone, Serialize)]
pub struct OptimizedRoute {
    pub route: Vec<Coordinate>,
    pub eta_seconds: u64,
    pub eta: String,
    pub distance_km: f64,
    #[serde(serialize_with = "serialize_telemetry")]
    pub traffic_info: TelemetryResult<TrafficFlow>,
    #[serde(serialize_with = "serialize_telemetry")]
    pub weather_info: TelemetryResult<WeatherReport>,
    #[serde(serialize_with = "serialize_telemetry")]
    pub traffic_incidents: TelemetryResult<Vec<TrafficIncident>>,
    pub impact: ImpactScores,
    pub reroute_advice: RerouteAdvice,
}
