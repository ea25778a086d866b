//! Domain types for the remote mapping service.
//!
//! # Data Flow
//! ```text
//! Caller-supplied options
//!     → validate.rs (field-level checks, before admission control)
//!     → typed request (RouteRequest / MatrixRequest / SnapRequest)
//!     → client (cache key derivation, transport call)
//!     → typed response (RouteResponse / MatrixResponse / SnapResponse)
//! ```
//!
//! # Design Decisions
//! - Locations accept either a coordinate pair or a free-form place string;
//!   both render to one canonical form so equivalent requests are
//!   indistinguishable downstream
//! - Validation failures identify the offending field

pub mod types;
pub mod validate;

pub use types::{
    Location, MatrixRequest, MatrixResponse, Route, RouteLeg, RouteRequest, RouteResponse,
    SnapRequest, SnapResponse, SnappedPoint, TravelMode,
};
