//! Shared types and models for the mail routing platform
//!
//! This crate contains the telemetry records, route legs and the pure
//! impact-scoring heuristic shared between the backend and other clients.

pub mod error;
pub mod impact;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use impact::*;
pub use models::*;
pub use types::*;
pub use validation::*;
