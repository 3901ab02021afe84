//! HTTP handlers for route planning

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use shared::{full_route, validate_place_name, RouteLeg};

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::middleware::AuthUser;
use crate::services::RoutePlanner;
use crate::AppState;

const RECALIBRATED_MESSAGE: &str = "Dynamically recalibrated route based on real-time traffic and weather";

fn route_planner(state: &AppState) -> RoutePlanner {
    RoutePlanner::new(
        state.providers.clone(),
        state.config.routing.incident_bbox_delta,
    )
}

/// Query parameters for a point-to-point route
#[derive(Debug, Deserialize)]
pub struct OptimizedRouteQuery {
    pub start: String,
    pub end: String,
}

/// Route directly between two places
pub async fn get_optimized_route(
    State(state): State<AppState>,
    Query(query): Query<OptimizedRouteQuery>,
) -> AppResult<Response> {
    validate_place_name(&query.start).map_err(|msg| AppError::validation("start", msg))?;
    validate_place_name(&query.end).map_err(|msg| AppError::validation("end", msg))?;

    let response = match route_planner(&state)
        .optimized_route(query.start.trim(), query.end.trim())
        .await
    {
        Ok(route) => Json(route).into_response(),
        Err(e) => Json(ErrorResponse::new(e.to_string())).into_response(),
    };
    Ok(response)
}

fn validate_stops(stops: &Vec<String>) -> Result<(), ValidationError> {
    for stop in stops {
        if let Err(msg) = validate_place_name(stop) {
            let mut error = ValidationError::new("place_name");
            error.message = Some(msg.into());
            return Err(error);
        }
    }
    Ok(())
}

/// Multi-stop route request from the dispatch desk
#[derive(Debug, Deserialize, Validate)]
pub struct DynamicRouteRequest {
    #[validate(length(min = 1, max = 200))]
    pub origin: String,
    #[validate(length(min = 1, max = 200))]
    pub destination: String,
    #[serde(default)]
    #[validate(custom = "validate_stops")]
    pub intermediate_post_offices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DynamicRouteResponse {
    pub optimized_route: Vec<RouteLeg>,
    pub message: String,
}

/// Plan every leg of origin, stops and destination in order
pub async fn plan_dynamic_route(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(input): Json<DynamicRouteRequest>,
) -> AppResult<Json<DynamicRouteResponse>> {
    input.validate()?;
    validate_place_name(&input.origin).map_err(|msg| AppError::validation("origin", msg))?;
    validate_place_name(&input.destination)
        .map_err(|msg| AppError::validation("destination", msg))?;

    if let Some(Extension(user)) = &user {
        tracing::info!(
            "Route requested by {} ({}) with {} stops",
            user.username,
            user.role.code(),
            input.intermediate_post_offices.len()
        );
    }

    let waypoints = full_route(
        &input.origin,
        &input.intermediate_post_offices,
        &input.destination,
    );
    let legs = route_planner(&state).plan_legs(&waypoints).await;

    Ok(Json(DynamicRouteResponse {
        optimized_route: legs,
        message: RECALIBRATED_MESSAGE.to_string(),
    }))
}
