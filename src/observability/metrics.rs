//! Metrics collection.
//!
//! # Metrics
//! - `maps_client_requests_total` (counter): outbound requests by operation, outcome
//! - `maps_client_cache_hits_total` / `maps_client_cache_misses_total` (counters)
//! - `maps_client_cache_expired_total` (counter): entries removed after TTL
//! - `maps_client_cache_evictions_total` (counter): entries evicted at capacity
//! - `maps_client_cache_size` (gauge): current entry count
//! - `maps_client_rate_limited_total` (counter): requests rejected by admission
//! - `maps_client_retries_total` (counter): retry attempts by operation

use metrics::{counter, gauge};

pub fn record_request(operation: &str, outcome: &str) {
    counter!(
        "maps_client_requests_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_cache_hit(operation: &str) {
    counter!("maps_client_cache_hits_total", "operation" => operation.to_string()).increment(1);
}

pub fn record_cache_miss(operation: &str) {
    counter!("maps_client_cache_misses_total", "operation" => operation.to_string()).increment(1);
}

pub fn record_cache_expired(count: u64) {
    counter!("maps_client_cache_expired_total").increment(count);
}

pub fn record_cache_eviction() {
    counter!("maps_client_cache_evictions_total").increment(1);
}

pub fn record_cache_size(size: usize) {
    gauge!("maps_client_cache_size").set(size as f64);
}

pub fn record_rate_limited(operation: &str) {
    counter!("maps_client_rate_limited_total", "operation" => operation.to_string()).increment(1);
}

pub fn record_retry(operation: &str) {
    counter!("maps_client_retries_total", "operation" => operation.to_string()).increment(1);
}
