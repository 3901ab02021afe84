//! Nominatim (OpenStreetMap) geocoding client

use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client};
use serde::Deserialize;

use shared::{Coordinate, TelemetryError, TelemetryResult};

use super::{fetch_json, Geocoder};

/// Nominatim search client
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    user_agent: String,
    base_url: String,
}

/// One search hit; Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimClient {
    /// Create a new client against the public Nominatim instance
    pub fn new(client: Client, user_agent: String) -> Self {
        Self::with_base_url(
            client,
            user_agent,
            "https://nominatim.openstreetmap.org".to_string(),
        )
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(client: Client, user_agent: String, base_url: String) -> Self {
        Self {
            client,
            user_agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn convert_places(location: &str, places: Vec<NominatimPlace>) -> TelemetryResult<Coordinate> {
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| TelemetryError::GeocodeNotFound(location.to_string()))?;

        let parse = |value: &str| {
            value.trim().parse::<f64>().map_err(|e| {
                TelemetryError::MalformedResponse(format!("bad coordinate {:?}: {}", value, e))
            })
        };

        Ok(Coordinate::new(parse(&place.lat)?, parse(&place.lon)?))
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, location: &str) -> TelemetryResult<Coordinate> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .header(USER_AGENT, &self.user_agent)
            .query(&[("q", location), ("format", "json"), ("limit", "1")]);

        let places: Vec<NominatimPlace> = fetch_json(request, "Nominatim").await?;
        let result = Self::convert_places(location, places);
        if let Err(e) = &result {
            tracing::warn!("Geocoding error for {:?}: {}", location, e);
        }
        result
    }
}
