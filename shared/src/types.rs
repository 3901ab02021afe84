//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Default half-width, in degrees, of the box used to query incidents
pub const DEFAULT_BBOX_DELTA: f64 = 0.5;

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build the incidents query box centred on this point
    pub fn bounding_box(&self, delta: f64) -> BoundingBox {
        BoundingBox {
            min_lon: self.longitude - delta,
            min_lat: self.latitude - delta,
            max_lon: self.longitude + delta,
            max_lat: self.latitude + delta,
        }
    }
}

/// Rectangular lat/lon region used to scope an incidents query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Render as `min_lon,min_lat,max_lon,max_lat`
    pub fn to_query_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Roles issued by the parcels backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Sender,
    Staff,
    Admin,
}

impl UserRole {
    pub fn code(&self) -> &'static str {
        match self {
            UserRole::Sender => "sender",
            UserRole::Staff => "staff",
            UserRole::Admin => "admin",
        }
    }

    /// Staff and admins may plan and modify routes
    pub fn can_plan_routes(&self) -> bool {
        matches!(self, UserRole::Staff | UserRole::Admin)
    }
}
