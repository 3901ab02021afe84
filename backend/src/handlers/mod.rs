//! HTTP request handlers

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use shared::{validate_place_name, TelemetryResult};

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::services::conditions::lookup_failure_message;

pub mod conditions;
pub mod health;
pub mod post_office;
pub mod route;

pub use conditions::*;
pub use health::*;
pub use post_office::*;
pub use route::*;

/// `?location=` query shared by the per-location endpoints
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub location: String,
}

impl LocationQuery {
    fn validated(&self) -> AppResult<&str> {
        validate_place_name(&self.location).map_err(|msg| AppError::validation("location", msg))?;
        Ok(self.location.trim())
    }
}

/// Render a lookup as its record, or a 200 `{"error": ...}` body on failure
fn lookup_response<T: Serialize>(location: &str, result: TelemetryResult<T>) -> Response {
    match result {
        Ok(record) => Json(record).into_response(),
        Err(e) => {
            tracing::debug!("Lookup for {:?} failed: {}", location, e);
            Json(ErrorResponse::new(lookup_failure_message(location, &e))).into_response()
        }
    }
}
