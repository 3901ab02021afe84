//! Validation utilities for routing requests

use crate::types::Coordinate;

/// Validate latitude and longitude ranges
pub fn validate_coordinate(coordinate: &Coordinate) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&coordinate.latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&coordinate.longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a free-text place name used as a waypoint
pub fn validate_place_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Location name cannot be empty");
    }
    if trimmed.chars().count() > 200 {
        return Err("Location name must be at most 200 characters");
    }
    Ok(())
}

/// Build the full waypoint list: origin, stops in order, destination.
/// Names are trimmed so they match what the geocoder is asked for.
pub fn full_route(origin: &str, stops: &[String], destination: &str) -> Vec<String> {
    let mut route = Vec::with_capacity(stops.len() + 2);
    route.push(origin.trim().to_string());
    route.extend(stops.iter().map(|stop| stop.trim().to_string()));
    route.push(destination.trim().to_string());
    route
}
