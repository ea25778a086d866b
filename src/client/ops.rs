//! Per-operation behavior: cache keys, request building, response parsing.

use url::Url;

use crate::api::types::{
    Location, MatrixRequest, MatrixResponse, RouteRequest, RouteResponse, SnapRequest,
    SnapResponse, TravelMode,
};
use crate::api::validate;
use crate::client::key::KeyBuilder;
use crate::error::{ClientError, ClientResult};
use crate::transport::TransportRequest;

/// A typed response held in the shared cache.
#[derive(Debug, Clone)]
pub enum CachedResponse {
    Route(RouteResponse),
    Matrix(MatrixResponse),
    Snap(SnapResponse),
}

/// One kind of remote lookup. The orchestrator runs a single flow over
/// this seam; implementations only decide how to validate, key, build
/// and parse.
pub trait Operation {
    type Output: Clone + Send + 'static;

    /// Operation tag, used in cache keys, logs and metrics labels.
    const TAG: &'static str;

    fn validate(&self) -> ClientResult<()>;
    fn cache_key(&self) -> String;
    fn build_request(&self, base_url: &Url) -> ClientResult<TransportRequest>;
    fn parse_response(body: &str) -> ClientResult<Self::Output>;
    fn into_cached(output: Self::Output) -> CachedResponse;
    fn from_cached(cached: CachedResponse) -> Option<Self::Output>;
}

fn join_locations(locations: &[Location]) -> String {
    locations
        .iter()
        .map(Location::canonical)
        .collect::<Vec<_>>()
        .join(";")
}

fn api_url(base_url: &Url, path: &str) -> ClientResult<Url> {
    base_url.join(path).map_err(|e| ClientError::Validation {
        field: "base_url".to_string(),
        message: format!("cannot build request URL: {}", e),
    })
}

fn append_mode(url: &mut Url, mode: Option<TravelMode>) {
    if let Some(mode) = mode {
        url.query_pairs_mut().append_pair("mode", mode.as_str());
    }
}

fn append_flag(url: &mut Url, name: &str, value: Option<bool>) {
    if let Some(value) = value {
        url.query_pairs_mut()
            .append_pair(name, if value { "true" } else { "false" });
    }
}

impl Operation for RouteRequest {
    type Output = RouteResponse;

    const TAG: &'static str = "route";

    fn validate(&self) -> ClientResult<()> {
        validate::validate_route(self)
    }

    fn cache_key(&self) -> String {
        KeyBuilder::new(Self::TAG)
            .locations(&self.waypoints)
            .mode(self.mode)
            .flag(self.alternatives)
            .flag(self.steps)
            .list(&self.annotations)
            .build()
    }

    fn build_request(&self, base_url: &Url) -> ClientResult<TransportRequest> {
        let mut url = api_url(base_url, "v1/route")?;
        url.query_pairs_mut()
            .append_pair("waypoints", &join_locations(&self.waypoints));
        append_mode(&mut url, self.mode);
        append_flag(&mut url, "alternatives", self.alternatives);
        append_flag(&mut url, "steps", self.steps);
        if !self.annotations.is_empty() {
            url.query_pairs_mut()
                .append_pair("annotations", &self.annotations.join(";"));
        }
        Ok(TransportRequest::get(url))
    }

    fn parse_response(body: &str) -> ClientResult<Self::Output> {
        Ok(serde_json::from_str(body)?)
    }

    fn into_cached(output: Self::Output) -> CachedResponse {
        CachedResponse::Route(output)
    }

    fn from_cached(cached: CachedResponse) -> Option<Self::Output> {
        match cached {
            CachedResponse::Route(response) => Some(response),
            _ => None,
        }
    }
}

impl Operation for MatrixRequest {
    type Output = MatrixResponse;

    const TAG: &'static str = "matrix";

    fn validate(&self) -> ClientResult<()> {
        validate::validate_matrix(self)
    }

    fn cache_key(&self) -> String {
        KeyBuilder::new(Self::TAG)
            .locations(&self.origins)
            .locations(&self.destinations)
            .mode(self.mode)
            .build()
    }

    fn build_request(&self, base_url: &Url) -> ClientResult<TransportRequest> {
        let mut url = api_url(base_url, "v1/matrix")?;
        url.query_pairs_mut()
            .append_pair("origins", &join_locations(&self.origins))
            .append_pair("destinations", &join_locations(&self.destinations));
        append_mode(&mut url, self.mode);
        Ok(TransportRequest::get(url))
    }

    fn parse_response(body: &str) -> ClientResult<Self::Output> {
        Ok(serde_json::from_str(body)?)
    }

    fn into_cached(output: Self::Output) -> CachedResponse {
        CachedResponse::Matrix(output)
    }

    fn from_cached(cached: CachedResponse) -> Option<Self::Output> {
        match cached {
            CachedResponse::Matrix(response) => Some(response),
            _ => None,
        }
    }
}

impl Operation for SnapRequest {
    type Output = SnapResponse;

    const TAG: &'static str = "snap";

    fn validate(&self) -> ClientResult<()> {
        validate::validate_snap(self)
    }

    fn cache_key(&self) -> String {
        KeyBuilder::new(Self::TAG)
            .locations(&self.points)
            .flag(self.interpolate)
            .build()
    }

    fn build_request(&self, base_url: &Url) -> ClientResult<TransportRequest> {
        let mut url = api_url(base_url, "v1/snap")?;
        url.query_pairs_mut()
            .append_pair("points", &join_locations(&self.points));
        append_flag(&mut url, "interpolate", self.interpolate);
        Ok(TransportRequest::get(url))
    }

    fn parse_response(body: &str) -> ClientResult<Self::Output> {
        Ok(serde_json::from_str(body)?)
    }

    fn into_cached(output: Self::Output) -> CachedResponse {
        CachedResponse::Snap(output)
    }

    fn from_cached(cached: CachedResponse) -> Option<Self::Output> {
        match cached {
            CachedResponse::Snap(response) => Some(response),
            _ => None,
        }
    }
}
