//! Route definitions for the mail routing API

use axum::{
    middleware,
    routing::get,
    Router,
};

use crate::{
    handlers,
    middleware::{auth_middleware, require_route_planner},
    AppState,
};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - live conditions and planning
        .merge(conditions_routes(state.clone()))
        .nest("/route", route_routes(state.clone()))
        .nest("/post-offices", post_office_routes(state))
}

/// Location lookups (protected)
fn conditions_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/geocode", get(handlers::geocode))
        .route("/traffic/flow", get(handlers::get_traffic_flow))
        .route("/traffic/incidents", get(handlers::get_traffic_incidents))
        .route("/weather", get(handlers::get_weather))
        .route("/weather/coords", get(handlers::get_weather_by_coords))
        .route("/transport/schedules", get(handlers::get_transport_schedules))
        .route("/impact", get(handlers::get_impact))
        .route("/all-data", get(handlers::get_all_data))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Route planning (protected; planning multi-stop routes needs staff)
fn route_routes(state: AppState) -> Router<AppState> {
    let plan = axum::routing::post(handlers::plan_dynamic_route).route_layer(
        middleware::from_fn_with_state(state.clone(), require_route_planner),
    );

    Router::new()
        .route(
            "/optimized",
            get(handlers::get_optimized_route).merge(plan),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Post office reference data (protected)
fn post_office_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:po_id", get(handlers::get_post_office))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
