//! Normalized traffic, weather and incident records

use serde::{Deserialize, Serialize, Serializer};

use crate::error::TelemetryResult;
use crate::types::Coordinate;

/// Congestion bucket derived from current vs free-flow speed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Low,
    Moderate,
    High,
    Unknown,
}

impl CongestionLevel {
    /// Ratio >= 0.9 is low, >= 0.6 moderate, anything slower is high.
    /// A non-positive free-flow speed gives no usable ratio.
    pub fn from_speeds(current_kmh: f64, free_flow_kmh: f64) -> Self {
        if free_flow_kmh <= 0.0 || !free_flow_kmh.is_finite() || !current_kmh.is_finite() {
            return CongestionLevel::Unknown;
        }
        let ratio = current_kmh / free_flow_kmh;
        if ratio >= 0.9 {
            CongestionLevel::Low
        } else if ratio >= 0.6 {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::High
        }
    }
}

/// Real-time traffic flow on the road segment nearest to a point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrafficFlow {
    pub location: Coordinate,
    pub current_speed_kmh: f64,
    pub free_flow_speed_kmh: f64,
    pub congestion_level: CongestionLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub road_closure: bool,
}

impl TrafficFlow {
    /// Current speed as a fraction of free-flow speed, if defined
    pub fn speed_ratio(&self) -> Option<f64> {
        if self.free_flow_speed_kmh > 0.0 {
            Some(self.current_speed_kmh / self.free_flow_speed_kmh)
        } else {
            None
        }
    }
}

/// Travel risk implied by the current weather condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeatherRisk {
    Low,
    High,
    Unknown,
}

impl WeatherRisk {
    /// Thunderstorm, rain and snow are high risk; everything else is low
    pub fn from_condition(condition: &str) -> Self {
        match condition.to_lowercase().as_str() {
            "thunderstorm" | "rain" | "snow" => WeatherRisk::High,
            _ => WeatherRisk::Low,
        }
    }
}

/// Current weather at a point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    pub location: Coordinate,
    pub condition: String,
    pub temperature_c: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction: Option<String>,
    pub risk: WeatherRisk,
}

/// A traffic incident reported inside a bounding box
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TrafficIncident {
    pub location: Vec<serde_json::Value>,
    pub incident_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub severity: Option<String>,
    pub is_road_closed: bool,
    pub is_traffic_jam: bool,
    pub delay: Option<f64>,
    pub end_point: Vec<serde_json::Value>,
}

impl TrafficIncident {
    /// Major/critical severity or a reported jam
    pub fn is_severe(&self) -> bool {
        let severe = self
            .severity
            .as_deref()
            .map(|s| matches!(s.to_lowercase().as_str(), "major" | "critical"))
            .unwrap_or(false);
        severe || self.is_traffic_jam
    }
}

/// Convert m/s to km/h, rounded to one decimal
pub fn wind_speed_kmh(speed_ms: f64) -> f64 {
    (speed_ms * 3.6 * 10.0).round() / 10.0
}

/// Map a bearing in degrees onto the 16-point compass
pub fn deg_to_compass(deg: f64) -> &'static str {
    const DIRECTIONS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let index = ((deg / 22.5) + 0.5).floor().rem_euclid(16.0) as usize;
    DIRECTIONS[index % 16]
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

/// Serialize a telemetry result as the record itself or `{"error": ...}`
pub fn serialize_telemetry<T, S>(value: &TelemetryResult<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Ok(record) => record.serialize(serializer),
        Err(err) => ErrorPayload {
            error: &err.to_string(),
        }
        .serialize(serializer),
    }
}

/// Owned wrapper so a bare telemetry result can be returned as JSON
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryPayload<T: Serialize>(
    #[serde(serialize_with = "serialize_telemetry")] pub TelemetryResult<T>,
);

impl<T: Serialize> From<TelemetryResult<T>> for TelemetryPayload<T> {
    fn from(result: TelemetryResult<T>) -> Self {
        Self(result)
    }
}
