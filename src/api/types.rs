//! Request and response types for the mapping service API.

use serde::{Deserialize, Serialize};

/// A place, given either as coordinates or as a free-form string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coords { lat: f64, lng: f64 },
    Place(String),
}

impl Location {
    pub fn coords(lat: f64, lng: f64) -> Self {
        Self::Coords { lat, lng }
    }

    pub fn place(name: impl Into<String>) -> Self {
        Self::Place(name.into())
    }

    /// Canonical rendering used for both the wire format and cache keys.
    ///
    /// Coordinates render with up to six decimal places, trailing zeros
    /// trimmed. A place string that parses as `"lat,lng"` renders exactly
    /// like the equivalent coordinate pair; any other string is trimmed
    /// and lowercased.
    pub fn canonical(&self) -> String {
        match self {
            Self::Coords { lat, lng } => format!("{},{}", format_coord(*lat), format_coord(*lng)),
            Self::Place(name) => match parse_coord_pair(name) {
                Some((lat, lng)) => format!("{},{}", format_coord(lat), format_coord(lng)),
                None => name.trim().to_ascii_lowercase(),
            },
        }
    }
}

impl From<(f64, f64)> for Location {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::Coords { lat, lng }
    }
}

impl From<&str> for Location {
    fn from(name: &str) -> Self {
        Self::Place(name.to_string())
    }
}

fn parse_coord_pair(text: &str) -> Option<(f64, f64)> {
    let (lat, lng) = text.split_once(',')?;
    Some((lat.trim().parse().ok()?, lng.trim().parse().ok()?))
}

fn format_coord(value: f64) -> String {
    let mut rendered = format!("{:.6}", value);
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    if rendered == "-0" {
        rendered = "0".to_string();
    }
    rendered
}

/// Travel mode for route and matrix lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Cycling,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }
}

/// Options for a route lookup between two or more waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Waypoints to visit in order; at least origin and destination.
    pub waypoints: Vec<Location>,
    pub mode: Option<TravelMode>,
    /// Request alternative routes.
    pub alternatives: Option<bool>,
    /// Include turn-by-turn steps.
    pub steps: Option<bool>,
    /// Extra per-segment annotations (e.g. "duration", "distance").
    #[serde(default)]
    pub annotations: Vec<String>,
}

impl RouteRequest {
    pub fn between(origin: impl Into<Location>, destination: impl Into<Location>) -> Self {
        Self {
            waypoints: vec![origin.into(), destination.into()],
            mode: None,
            alternatives: None,
            steps: None,
            annotations: Vec::new(),
        }
    }
}

/// A single computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance_m: f64,
    pub duration_s: f64,
    /// Encoded polyline geometry, when requested.
    pub geometry: Option<String>,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// One leg of a route, between consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_m: f64,
    pub duration_s: f64,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub routes: Vec<Route>,
}

/// Options for a distance-matrix lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRequest {
    pub origins: Vec<Location>,
    pub destinations: Vec<Location>,
    pub mode: Option<TravelMode>,
}

/// Row-major durations (seconds) and distances (meters), origins × destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixResponse {
    pub durations: Vec<Vec<f64>>,
    pub distances: Vec<Vec<f64>>,
}

/// Options for snapping GPS points to the road network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapRequest {
    /// Points to snap; must be coordinates.
    pub points: Vec<Location>,
    /// Also return interpolated points along the road.
    pub interpolate: Option<bool>,
}

/// A point snapped onto the road network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnappedPoint {
    pub lat: f64,
    pub lng: f64,
    /// Index of the input point this snap belongs to; absent for
    /// interpolated points.
    pub original_index: Option<usize>,
    pub street: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapResponse {
    pub points: Vec<SnappedPoint>,
}
