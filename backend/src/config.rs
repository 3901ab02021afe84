//! Configuration management for the mail routing service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with MRA_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// JWT authentication configuration
    pub auth: AuthConfig,

    /// Nominatim geocoding configuration
    pub geocoding: GeocodingConfig,

    /// Azure Maps configuration (traffic, incidents, directions)
    pub azure_maps: AzureMapsConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Route planning tunables
    pub routing: RoutingConfig,

    /// Post office reference data
    #[serde(default)]
    pub post_offices: PostOfficeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Require a bearer token on API routes
    pub enabled: bool,

    /// Secret shared with the parcels backend that issues tokens
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    pub base_url: String,

    /// User-Agent sent to Nominatim (required by its usage policy)
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AzureMapsConfig {
    /// Azure Maps base URL
    pub base_url: String,

    /// Azure Maps subscription key
    #[serde(default)]
    pub subscription_key: String,

    /// Travel mode for route directions (car, truck)
    pub travel_mode: String,

    /// Zoom level for traffic flow segment lookups
    pub traffic_zoom: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoutingConfig {
    /// Half-width in degrees of the incidents bounding box
    pub incident_bbox_delta: f64,

    /// Timeout applied to every upstream request
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PostOfficeConfig {
    /// CSV file with Pincode/OfficeName/City/Latitude/Longitude columns
    pub csv_path: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("MRA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("auth.enabled", true)?
            .set_default("auth.jwt_secret", "development-secret-key")?
            .set_default("geocoding.base_url", "https://nominatim.openstreetmap.org")?
            .set_default("geocoding.user_agent", "mail-route-advisor/0.1")?
            .set_default("azure_maps.base_url", "https://atlas.microsoft.com")?
            .set_default("azure_maps.travel_mode", "car")?
            .set_default("azure_maps.traffic_zoom", 10)?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("routing.incident_bbox_delta", shared::DEFAULT_BBOX_DELTA)?
            .set_default("routing.request_timeout_secs", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (MRA_ prefix)
            .add_source(
                Environment::with_prefix("MRA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            auth: AuthConfig {
                enabled: true,
                jwt_secret: "development-secret-key".to_string(),
            },
            geocoding: GeocodingConfig {
                base_url: "https://nominatim.openstreetmap.org".to_string(),
                user_agent: "mail-route-advisor/0.1".to_string(),
            },
            azure_maps: AzureMapsConfig {
                base_url: "https://atlas.microsoft.com".to_string(),
                subscription_key: String::new(),
                travel_mode: "car".to_string(),
                traffic_zoom: 10,
            },
            weather: WeatherConfig {
                api_endpoint: "https://api.openweathermap.org/data/2.5".to_string(),
                api_key: String::new(),
            },
            routing: RoutingConfig {
                incident_bbox_delta: shared::DEFAULT_BBOX_DELTA,
                request_timeout_secs: 30,
            },
            post_offices: PostOfficeConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}
