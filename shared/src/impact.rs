//! Route impact scoring and rerouting advice
//!
//! Each scorer maps one telemetry record to a multiplicative risk factor where
//! `1.0` means no impact. Missing or failed records always score `1.0`, so a
//! broken upstream never makes a route look worse than it is.
//!
//! The three factors are reported side by side and are never combined.

use serde::{Deserialize, Serialize};

use crate::models::{CongestionLevel, TrafficFlow, TrafficIncident, WeatherReport, WeatherRisk};

/// Neutral factor
pub const NO_IMPACT: f64 = 1.0;

pub const HEAVY_TRAFFIC_REASON: &str = "Heavy traffic detected. Consider rerouting.";
pub const SEVERE_WEATHER_REASON: &str = "Severe weather conditions detected. Consider rerouting.";
pub const NO_REROUTE_REASON: &str = "No rerouting needed.";

/// Score the weather at a point
pub fn assess_weather_impact(weather: Option<&WeatherReport>) -> f64 {
    let Some(weather) = weather else {
        return NO_IMPACT;
    };
    let condition = weather.condition.to_lowercase();
    let has = |word: &str| condition.contains(word);

    if has("thunderstorm") || weather.risk == WeatherRisk::High {
        1.5
    } else if has("rain") || has("snow") || has("drizzle") {
        1.2
    } else if has("fog") || has("mist") {
        1.1
    } else {
        NO_IMPACT
    }
}

/// Score the traffic flow on the segment nearest to a point
pub fn assess_traffic_flow_impact(flow: Option<&TrafficFlow>) -> f64 {
    let Some(flow) = flow else {
        return NO_IMPACT;
    };
    let ratio = flow.speed_ratio();
    let below = |limit: f64| ratio.map(|r| r < limit).unwrap_or(false);

    if flow.congestion_level == CongestionLevel::High || below(0.5) {
        1.4
    } else if flow.congestion_level == CongestionLevel::Moderate || below(0.75) {
        1.2
    } else {
        NO_IMPACT
    }
}

/// Score the incidents reported around a point.
///
/// A single road closure dominates everything else in the list.
pub fn assess_traffic_incidents_impact(incidents: Option<&[TrafficIncident]>) -> f64 {
    let Some(incidents) = incidents else {
        return NO_IMPACT;
    };

    let mut severe = 0usize;
    for incident in incidents {
        if incident.is_road_closed {
            return 2.0;
        }
        if incident.is_severe() {
            severe += 1;
        }
    }

    match severe {
        0 => NO_IMPACT,
        1..=2 => 1.2,
        _ => 1.5,
    }
}

/// The three independent impact factors for one location
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ImpactScores {
    pub weather: f64,
    pub traffic_flow: f64,
    pub incidents: f64,
}

impl ImpactScores {
    pub fn assess(
        weather: Option<&WeatherReport>,
        flow: Option<&TrafficFlow>,
        incidents: Option<&[TrafficIncident]>,
    ) -> Self {
        Self {
            weather: assess_weather_impact(weather),
            traffic_flow: assess_traffic_flow_impact(flow),
            incidents: assess_traffic_incidents_impact(incidents),
        }
    }
}

/// Whether a leg should be rerouted and why
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RerouteAdvice {
    pub should_reroute: bool,
    pub reason: String,
}

impl RerouteAdvice {
    fn new(should_reroute: bool, reason: &str) -> Self {
        Self {
            should_reroute,
            reason: reason.to_string(),
        }
    }
}

/// Decide whether to reroute from the traffic and weather at a leg's start.
///
/// Traffic is checked first. Heavy traffic means the top congestion bucket
/// (`High`) and severe weather means `WeatherRisk::High`; these are the only
/// values the adapters emit for those conditions.
pub fn suggest_rerouting(
    flow: Option<&TrafficFlow>,
    weather: Option<&WeatherReport>,
) -> RerouteAdvice {
    if flow.map(|f| f.congestion_level) == Some(CongestionLevel::High) {
        return RerouteAdvice::new(true, HEAVY_TRAFFIC_REASON);
    }
    if weather.map(|w| w.risk) == Some(WeatherRisk::High) {
        return RerouteAdvice::new(true, SEVERE_WEATHER_REASON);
    }
    RerouteAdvice::new(false, NO_REROUTE_REASON)
}
