//! Weather API client for fetching current conditions
//!
//! Integrates with OpenWeatherMap API for current conditions

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use shared::{
    deg_to_compass, wind_speed_kmh, Coordinate, TelemetryError, TelemetryResult, WeatherReport,
    WeatherRisk,
};

use super::{fetch_json, WeatherSource};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    #[serde(default)]
    weather: Vec<OWMWeather>,
    #[serde(default)]
    main: Option<OWMMain>,
    #[serde(default)]
    wind: Option<OWMWind>,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(
            client,
            api_key,
            "https://api.openweathermap.org/data/2.5".to_string(),
        )
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Convert OpenWeatherMap current response to our format
    fn convert_current_response(at: Coordinate, data: OWMCurrentResponse) -> WeatherReport {
        let condition = data
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "Clear".to_string());
        let wind = data.wind.as_ref();

        WeatherReport {
            location: at,
            risk: WeatherRisk::from_condition(&condition),
            condition,
            temperature_c: data.main.and_then(|m| m.temp),
            wind_speed_kmh: wind.and_then(|w| w.speed).map(wind_speed_kmh),
            wind_direction: wind
                .and_then(|w| w.deg)
                .map(|deg| deg_to_compass(deg).to_string()),
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    /// Fetch current weather conditions by GPS coordinates
    async fn current_weather(&self, at: Coordinate) -> TelemetryResult<WeatherReport> {
        if self.api_key.is_empty() {
            tracing::warn!("OpenWeather API key is not set");
            return Err(TelemetryError::MissingCredentials("OpenWeather"));
        }

        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();
        let request = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ]);

        let data: OWMCurrentResponse = fetch_json(request, "OpenWeather").await?;
        Ok(Self::convert_current_response(at, data))
    }
}
