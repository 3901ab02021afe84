//! Business logic services for the mail routing platform

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::external::{
    http_client, AzureMapsClient, DirectionsSource, Geocoder, NominatimClient, TrafficSource,
    WeatherClient, WeatherSource,
};

pub mod conditions;
pub mod post_office;
pub mod route_planner;

pub use conditions::ConditionsService;
pub use post_office::{DirectoryGeocoder, PostOfficeDirectory};
pub use route_planner::{RoutePlanError, RoutePlanner};

/// The upstream data sources services depend on
#[derive(Clone)]
pub struct Providers {
    pub geocoder: Arc<dyn Geocoder>,
    pub directions: Arc<dyn DirectionsSource>,
    pub traffic: Arc<dyn TrafficSource>,
    pub weather: Arc<dyn WeatherSource>,
}

impl Providers {
    /// Build the real HTTP clients; post offices resolve before Nominatim
    pub fn from_config(
        config: &Config,
        post_offices: Arc<PostOfficeDirectory>,
    ) -> Result<Self, reqwest::Error> {
        let client = http_client(Duration::from_secs(config.routing.request_timeout_secs))?;

        let nominatim = NominatimClient::with_base_url(
            client.clone(),
            config.geocoding.user_agent.clone(),
            config.geocoding.base_url.clone(),
        );
        let azure = Arc::new(AzureMapsClient::with_base_url(
            client.clone(),
            config.azure_maps.subscription_key.clone(),
            config.azure_maps.travel_mode.clone(),
            config.azure_maps.traffic_zoom,
            config.azure_maps.base_url.clone(),
        ));
        let weather = WeatherClient::with_base_url(
            client,
            config.weather.api_key.clone(),
            config.weather.api_endpoint.clone(),
        );

        Ok(Self {
            geocoder: Arc::new(DirectoryGeocoder::new(post_offices, Arc::new(nominatim))),
            directions: azure.clone(),
            traffic: azure,
            weather: Arc::new(weather),
        })
    }
}
