//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the maps client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Remote service endpoint settings.
    pub endpoint: EndpointConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Retry and backoff settings.
    pub retry: RetryConfig,

    /// Admission control settings.
    pub rate_limit: RateLimitConfig,
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the mapping service (e.g., "https://maps.example.com").
    pub base_url: String,

    /// Optional API key, sent as the `x-api-key` header.
    pub api_key: Option<String>,

    /// Total per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            api_key: None,
            timeout_ms: 10_000,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable response caching.
    pub enabled: bool,

    /// Default time-to-live for cached entries in milliseconds.
    pub default_ttl_ms: u64,

    /// Maximum number of cached entries.
    pub max_entries: usize,

    /// Track hit/miss/expiry statistics.
    pub enable_stats: bool,

    /// Interval of the background expiry sweep in milliseconds.
    pub sweep_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_ms: 300_000,
            max_entries: 1000,
            enable_stats: true,
            sweep_interval_ms: 60_000,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Base delay for exponential backoff in milliseconds.
    pub base_ms: u64,

    /// Multiplier applied to the delay on each further attempt.
    pub factor: f64,

    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Cap on a single backoff delay in milliseconds, if set.
    pub max_delay_ms: Option<u64>,

    /// Upstream statuses that are worth retrying.
    pub retryable_status_codes: Vec<u16>,

    /// Retry on network-level failures (timeouts, connection errors).
    pub retry_on_network_error: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_ms: 1000,
            factor: 2.0,
            max_retries: 3,
            max_delay_ms: Some(30_000),
            retryable_status_codes: vec![429, 500, 502, 503, 504],
            retry_on_network_error: true,
        }
    }
}

/// Admission control configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum tokens the bucket can hold.
    pub capacity: f64,

    /// Tokens credited per refill interval.
    pub refill_rate: f64,

    /// Refill interval in milliseconds.
    pub refill_interval_ms: u64,

    /// Allow tokens to accumulate across idle intervals up to capacity.
    /// When false, the bucket never holds more than one interval's credit.
    pub allow_burst: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 10.0,
            refill_rate: 1.0,
            refill_interval_ms: 1000,
            allow_burst: true,
        }
    }
}

/// Partial rate-limit configuration for runtime updates.
///
/// Every field is optional; unset fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateLimitUpdate {
    pub capacity: Option<f64>,
    pub refill_rate: Option<f64>,
    pub refill_interval_ms: Option<u64>,
    pub allow_burst: Option<bool>,
}

impl RateLimitConfig {
    /// Merge a partial update into this configuration.
    pub fn apply(&mut self, update: &RateLimitUpdate) {
        if let Some(capacity) = update.capacity {
            self.capacity = capacity;
        }
        if let Some(refill_rate) = update.refill_rate {
            self.refill_rate = refill_rate;
        }
        if let Some(interval) = update.refill_interval_ms {
            self.refill_interval_ms = interval;
        }
        if let Some(allow_burst) = update.allow_burst {
            self.allow_burst = allow_burst;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::default();
        assert_eq!(config.cache.default_ttl_ms, 300_000);
        assert_eq!(config.cache.max_entries, 1000);
        assert!(config.cache.enable_stats);
        assert_eq!(config.retry.base_ms, 1000);
        assert_eq!(config.retry.factor, 2.0);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.max_delay_ms, Some(30_000));
        assert_eq!(config.retry.retryable_status_codes, vec![429, 500, 502, 503, 504]);
        assert_eq!(config.rate_limit.capacity, 10.0);
        assert_eq!(config.rate_limit.refill_rate, 1.0);
        assert_eq!(config.rate_limit.refill_interval_ms, 1000);
        assert!(config.rate_limit.allow_burst);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [endpoint]
            base_url = "https://maps.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint.base_url, "https://maps.example.com");
        assert_eq!(config.endpoint.timeout_ms, 10_000);
        assert_eq!(config.cache.max_entries, 1000);
    }

    #[test]
    fn partial_update_merges() {
        let mut config = RateLimitConfig::default();
        config.apply(&RateLimitUpdate {
            refill_rate: Some(5.0),
            ..Default::default()
        });
        assert_eq!(config.refill_rate, 5.0);
        assert_eq!(config.capacity, 10.0);
    }
}
