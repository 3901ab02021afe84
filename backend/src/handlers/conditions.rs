//! HTTP handlers for per-location traffic, weather and impact lookups

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;

use shared::{validate_coordinate, Coordinate, TelemetryPayload, TransportSchedules, WeatherReport};

use super::{lookup_response, LocationQuery};
use crate::error::{AppError, AppResult};
use crate::services::ConditionsService;
use crate::AppState;

fn conditions_service(state: &AppState) -> ConditionsService {
    ConditionsService::new(
        state.providers.clone(),
        state.config.routing.incident_bbox_delta,
    )
}

/// Resolve a place name to coordinates
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Response> {
    let location = query.validated()?;
    let result = conditions_service(&state).geocode(location).await;
    Ok(lookup_response(location, result))
}

/// Live traffic flow at a place
pub async fn get_traffic_flow(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Response> {
    let location = query.validated()?;
    let result = conditions_service(&state).traffic_flow(location).await;
    Ok(lookup_response(location, result))
}

/// Query parameters for incident lookups
#[derive(Debug, Deserialize)]
pub struct IncidentQuery {
    pub location: String,
    pub incident_type: Option<String>,
}

/// Traffic incidents around a place
pub async fn get_traffic_incidents(
    State(state): State<AppState>,
    Query(query): Query<IncidentQuery>,
) -> AppResult<Response> {
    let location = LocationQuery {
        location: query.location,
    };
    let name = location.validated()?;
    let incident_type = query.incident_type.as_deref().filter(|t| !t.is_empty());
    let result = conditions_service(&state)
        .traffic_incidents(name, incident_type)
        .await;
    Ok(lookup_response(name, result))
}

/// Current weather at a place
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Response> {
    let location = query.validated()?;
    let result = conditions_service(&state).weather(location).await;
    Ok(lookup_response(location, result))
}

/// Query parameters for weather by coordinates
#[derive(Debug, Deserialize)]
pub struct CoordinatesQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Current weather at explicit coordinates
pub async fn get_weather_by_coords(
    State(state): State<AppState>,
    Query(query): Query<CoordinatesQuery>,
) -> AppResult<Json<TelemetryPayload<WeatherReport>>> {
    let at = Coordinate::new(query.lat, query.lon);
    validate_coordinate(&at).map_err(|msg| AppError::validation("coordinates", msg))?;
    let result = conditions_service(&state).weather_at(at).await;
    Ok(Json(result.into()))
}

/// Static public transport schedules
pub async fn get_transport_schedules() -> Json<TransportSchedules> {
    Json(TransportSchedules::static_rail())
}

/// Weather, traffic flow and incident impact factors for a place
pub async fn get_impact(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Response> {
    let location = query.validated()?;
    let result = conditions_service(&state).impact(location).await;
    Ok(lookup_response(location, result))
}

/// Everything known about a place in one response
pub async fn get_all_data(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Response> {
    let location = query.validated()?;
    let result = conditions_service(&state).all_data(location).await;
    Ok(lookup_response(location, result))
}
