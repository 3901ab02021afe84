//! Post office reference records

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// A head post office with a known position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostOffice {
    #[serde(rename = "Pincode", alias = "PO_ID")]
    pub id: String,
    #[serde(rename = "OfficeName", default)]
    pub office_name: String,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

impl PostOffice {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
