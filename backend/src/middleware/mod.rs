//! Request middleware

pub mod auth;

pub use auth::{auth_middleware, require_route_planner, AuthUser, Claims};
