//! Client orchestration.
//!
//! # Data Flow
//! ```text
//! route() / matrix() / snap_to_roads()
//!     → validate options
//!     → cache lookup (skipped on bypass/refresh; a hit returns here and
//!       touches neither the rate limiter nor the retry policy)
//!     → RateLimiter.acquire(1)  — false fails fast with RateLimited
//!     → RetryPolicy.execute(send via Transport, classify status, parse)
//!     → cache population
//! ```
//!
//! # Design Decisions
//! - One generic flow over the Operation seam; per-kind code only builds
//!   keys/requests and parses responses
//! - Admission rejection happens before the retry policy and is never
//!   retried
//! - Concurrent misses for the same key may each reach the transport and
//!   each populate the cache; last write wins

pub mod key;
pub mod ops;

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::api::types::{
    MatrixRequest, MatrixResponse, RouteRequest, RouteResponse, SnapRequest, SnapResponse,
};
use crate::cache::{CacheStats, ResponseCache};
use crate::config::schema::{ClientConfig, RateLimitUpdate};
use crate::config::validation::validate_config;
use crate::error::{ClientError, ClientResult};
use crate::limiter::RateLimiter;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::transport::{HttpTransport, Transport};

pub use ops::CachedResponse;
use ops::Operation;

/// Per-call options for cache interaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOptions {
    /// Skip the cache entirely: no lookup, no store.
    pub bypass_cache: bool,
    /// Skip the lookup but store the fresh result.
    pub refresh: bool,
    /// Override the configured default TTL for this result.
    pub ttl: Option<Duration>,
}

/// Resilient client for the remote mapping service.
///
/// Owns one rate limiter, one retry policy and one response cache, shared
/// across every call made through this instance.
pub struct MapsClient<T: Transport = HttpTransport> {
    base_url: Url,
    transport: Arc<T>,
    limiter: RateLimiter,
    retry: RetryPolicy,
    cache: ResponseCache<CachedResponse>,
    cache_enabled: bool,
}

impl MapsClient<HttpTransport> {
    /// Create a client using the HTTP transport.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(&config.endpoint)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> MapsClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> ClientResult<Self> {
        if let Err(errors) = validate_config(&config) {
            let first = &errors[0];
            return Err(ClientError::Validation {
                field: first.field.clone(),
                message: first.message.clone(),
            });
        }
        let base_url = Url::parse(&config.endpoint.base_url).map_err(|e| {
            ClientError::Validation {
                field: "endpoint.base_url".to_string(),
                message: e.to_string(),
            }
        })?;

        tracing::info!(
            base_url = %base_url,
            cache_enabled = config.cache.enabled,
            capacity = config.rate_limit.capacity,
            max_retries = config.retry.max_retries,
            "Maps client initialized"
        );

        Ok(Self {
            base_url,
            transport: Arc::new(transport),
            limiter: RateLimiter::new(config.rate_limit.clone()),
            retry: RetryPolicy::new(config.retry.clone()),
            cache: ResponseCache::new(config.cache.clone()),
            cache_enabled: config.cache.enabled,
        })
    }

    /// Look up a route between waypoints.
    pub async fn route(&self, request: &RouteRequest) -> ClientResult<RouteResponse> {
        self.execute(request, CallOptions::default()).await
    }

    pub async fn route_with(
        &self,
        request: &RouteRequest,
        options: CallOptions,
    ) -> ClientResult<RouteResponse> {
        self.execute(request, options).await
    }

    /// Look up a duration/distance matrix between origins and destinations.
    pub async fn matrix(&self, request: &MatrixRequest) -> ClientResult<MatrixResponse> {
        self.execute(request, CallOptions::default()).await
    }

    pub async fn matrix_with(
        &self,
        request: &MatrixRequest,
        options: CallOptions,
    ) -> ClientResult<MatrixResponse> {
        self.execute(request, options).await
    }

    /// Snap GPS points to the road network.
    pub async fn snap_to_roads(&self, request: &SnapRequest) -> ClientResult<SnapResponse> {
        self.execute(request, CallOptions::default()).await
    }

    pub async fn snap_to_roads_with(
        &self,
        request: &SnapRequest,
        options: CallOptions,
    ) -> ClientResult<SnapResponse> {
        self.execute(request, options).await
    }

    /// Drop the cached result for a route request, if any.
    pub fn invalidate_route(&self, request: &RouteRequest) -> bool {
        self.cache.del(&request.cache_key())
    }

    /// Drop the cached result for a matrix request, if any.
    pub fn invalidate_matrix(&self, request: &MatrixRequest) -> bool {
        self.cache.del(&request.cache_key())
    }

    /// Drop the cached result for a snap request, if any.
    pub fn invalidate_snap(&self, request: &SnapRequest) -> bool {
        self.cache.del(&request.cache_key())
    }

    /// Current cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Empty the response cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Current rate-limiter token count.
    pub fn token_count(&self) -> f64 {
        self.limiter.token_count()
    }

    /// Apply a partial rate-limit configuration update at runtime.
    pub fn update_rate_limit(&self, update: &RateLimitUpdate) {
        self.limiter.update_config(update);
    }

    /// Release background resources. Idempotent; the client must not be
    /// dropped without calling this or the cache sweeper task leaks.
    pub fn shutdown(&self) {
        self.cache.shutdown();
        tracing::debug!("Maps client shut down");
    }

    /// The single orchestration flow every operation runs through.
    async fn execute<R: Operation>(
        &self,
        request: &R,
        options: CallOptions,
    ) -> ClientResult<R::Output> {
        request.validate()?;

        let key = request.cache_key();
        let use_cache = self.cache_enabled && !options.bypass_cache;

        if use_cache && !options.refresh {
            if let Some(cached) = self.cache.get(&key) {
                if let Some(output) = R::from_cached(cached) {
                    metrics::record_cache_hit(R::TAG);
                    tracing::debug!(operation = R::TAG, key = %key, "Cache hit");
                    return Ok(output);
                }
            }
            metrics::record_cache_miss(R::TAG);
        }

        if !self.limiter.acquire(1.0) {
            metrics::record_rate_limited(R::TAG);
            metrics::record_request(R::TAG, "rate_limited");
            tracing::warn!(operation = R::TAG, "Rate limit exceeded, rejecting request");
            return Err(ClientError::RateLimited);
        }

        let transport_request = request.build_request(&self.base_url)?;
        let transport = &self.transport;
        let result = self
            .retry
            .execute(R::TAG, || {
                let transport = Arc::clone(transport);
                let attempt_request = transport_request.clone();
                async move {
                    let response = transport.send(attempt_request).await?;
                    if response.status >= 400 {
                        return Err(ClientError::upstream(response.status));
                    }
                    R::parse_response(&response.body)
                }
            })
            .await;

        match result {
            Ok(output) => {
                if use_cache {
                    self.cache
                        .set(&key, R::into_cached(output.clone()), options.ttl);
                }
                metrics::record_request(R::TAG, "success");
                Ok(output)
            }
            Err(error) => {
                metrics::record_request(R::TAG, "error");
                tracing::warn!(operation = R::TAG, error = %error, "Request failed");
                Err(error)
            }
        }
    }
}
