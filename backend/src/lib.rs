//! Mail Route Advisor - Backend
//!
//! Plans multi-stop mail delivery routes from live traffic, incident and
//! weather telemetry, and serves per-location condition lookups.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{PostOfficeDirectory, Providers};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub providers: Providers,
    pub post_offices: Arc<PostOfficeDirectory>,
}

impl AppState {
    /// Load post offices and build the upstream clients from configuration
    pub fn from_config(config: Config) -> AppResult<Self> {
        let post_offices = Arc::new(match &config.post_offices.csv_path {
            Some(path) => PostOfficeDirectory::load(path).unwrap_or_else(|e| {
                tracing::error!("Could not load post offices from {}: {}", path, e);
                PostOfficeDirectory::empty()
            }),
            None => PostOfficeDirectory::empty(),
        });

        let providers = Providers::from_config(&config, post_offices.clone())
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            providers,
            post_offices,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Mail Route Advisor API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
