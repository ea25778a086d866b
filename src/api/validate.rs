//! Request validation.
//!
//! # Responsibilities
//! - Field-level checks on caller-supplied options, before admission
//!   control or any transport work
//! - Identify the offending field in every rejection

use crate::api::types::{Location, MatrixRequest, RouteRequest, SnapRequest};
use crate::error::{ClientError, ClientResult};

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ClientError {
    ClientError::Validation {
        field: field.into(),
        message: message.into(),
    }
}

fn check_location(field: &str, location: &Location) -> ClientResult<()> {
    match location {
        Location::Coords { lat, lng } => {
            if !(-90.0..=90.0).contains(lat) {
                return Err(invalid(field, format!("latitude {} out of range [-90, 90]", lat)));
            }
            if !(-180.0..=180.0).contains(lng) {
                return Err(invalid(field, format!("longitude {} out of range [-180, 180]", lng)));
            }
            Ok(())
        }
        Location::Place(name) => {
            if name.trim().is_empty() {
                return Err(invalid(field, "place name must not be empty"));
            }
            Ok(())
        }
    }
}

fn check_locations(field: &str, locations: &[Location]) -> ClientResult<()> {
    for (i, location) in locations.iter().enumerate() {
        check_location(&format!("{}[{}]", field, i), location)?;
    }
    Ok(())
}

/// Validate route options.
pub fn validate_route(request: &RouteRequest) -> ClientResult<()> {
    if request.waypoints.len() < 2 {
        return Err(invalid("waypoints", "at least two waypoints are required"));
    }
    check_locations("waypoints", &request.waypoints)
}

/// Validate distance-matrix options.
pub fn validate_matrix(request: &MatrixRequest) -> ClientResult<()> {
    if request.origins.is_empty() {
        return Err(invalid("origins", "at least one origin is required"));
    }
    if request.destinations.is_empty() {
        return Err(invalid("destinations", "at least one destination is required"));
    }
    check_locations("origins", &request.origins)?;
    check_locations("destinations", &request.destinations)
}

/// Validate road-snap options. Snap points must be coordinates.
pub fn validate_snap(request: &SnapRequest) -> ClientResult<()> {
    if request.points.is_empty() {
        return Err(invalid("points", "at least one point is required"));
    }
    for (i, point) in request.points.iter().enumerate() {
        let field = format!("points[{}]", i);
        if matches!(point, Location::Place(_)) {
            return Err(invalid(field, "snap points must be coordinates"));
        }
        check_location(&field, point)?;
    }
    Ok(())
}
