//! HTTP handlers for post office reference data

use axum::{
    extract::{Path, State},
    Json,
};

use shared::PostOffice;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Get a post office by id
pub async fn get_post_office(
    State(state): State<AppState>,
    Path(po_id): Path<String>,
) -> AppResult<Json<PostOffice>> {
    state
        .post_offices
        .get(&po_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Post office {}", po_id)))
}
