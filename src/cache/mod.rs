//! Bounded TTL response cache.
//!
//! # Data Flow
//! ```text
//! Orchestrator:
//!     → get (lazy expiry check, hit/miss accounting)
//!     → set (evict oldest at capacity, stamp expiry once)
//!
//! Background:
//!     → sweeper task (fixed interval, removes expired entries proactively)
//! ```
//!
//! # Design Decisions
//! - Eviction is oldest-by-creation, tracked in an insertion-ordered index;
//!   access never reorders entries (this is not an LRU)
//! - Every entry's expiry is computed once at insertion and never mutated
//! - One mutex guards map and index so check-expire-evict-insert happens
//!   as a single critical section
//! - Each cache owns its sweeper task and the shutdown channel that stops it

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

use crate::config::schema::CacheConfig;
use crate::observability::metrics;

/// Counters exposed by [`ResponseCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
    pub expired_count: u64,
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
    /// Position in the creation-ordered index.
    index_key: (Instant, u64),
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Creation-ordered index: (created_at, insertion seq) → key.
    /// The first entry is always the eviction candidate.
    creation_index: BTreeMap<(Instant, u64), String>,
    next_seq: u64,
    hits: u64,
    misses: u64,
    expired: u64,
}

impl<V> CacheState<V> {
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.creation_index.remove(&entry.index_key);
        Some(entry)
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.creation_index.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

struct CacheInner<V> {
    state: Mutex<CacheState<V>>,
    config: CacheConfig,
    shutdown: broadcast::Sender<()>,
}

/// Bounded TTL store shared across all calls of one client.
#[derive(Clone)]
pub struct ResponseCache<V> {
    inner: Arc<CacheInner<V>>,
}

impl<V> ResponseCache<V>
where
    V: Clone + Send + 'static,
{
    /// Create a cache and start its background expiry sweeper.
    ///
    /// The sweeper runs until [`shutdown`](Self::shutdown) is called; a
    /// cache that is dropped without shutdown leaks the recurring task.
    pub fn new(config: CacheConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let cache = Self {
            inner: Arc::new(CacheInner {
                state: Mutex::new(CacheState {
                    entries: HashMap::new(),
                    creation_index: BTreeMap::new(),
                    next_seq: 0,
                    hits: 0,
                    misses: 0,
                    expired: 0,
                }),
                config,
                shutdown: shutdown_tx,
            }),
        };

        cache.spawn_sweeper(shutdown_rx);
        cache
    }

    fn spawn_sweeper(&self, mut shutdown: broadcast::Receiver<()>) {
        let inner = Arc::clone(&self.inner);
        let interval = Duration::from_millis(self.inner.config.sweep_interval_ms);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        Self::sweep(&inner);
                    }
                    _ = shutdown.recv() => {
                        tracing::debug!("Cache sweeper received shutdown signal, exiting loop");
                        break;
                    }
                }
            }
        });
    }

    /// Remove every expired entry, counting each removal.
    fn sweep(inner: &CacheInner<V>) {
        let now = Instant::now();
        let mut state = inner.state.lock().expect("cache mutex poisoned");

        let expired_keys: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| now > entry.expires_at)
            .map(|(key, _)| key.clone())
            .collect();

        let removed = expired_keys.len() as u64;
        for key in &expired_keys {
            state.remove_entry(key);
        }

        if removed > 0 {
            if inner.config.enable_stats {
                state.expired += removed;
            }
            metrics::record_cache_expired(removed);
            metrics::record_cache_size(state.entries.len());
            tracing::debug!(removed, "Swept expired cache entries");
        }
    }

    /// Look up a key, expiring it lazily if its TTL has passed.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut state = self.inner.state.lock().expect("cache mutex poisoned");
        let stats = self.inner.config.enable_stats;

        match state.entries.get(key) {
            None => {
                if stats {
                    state.misses += 1;
                }
                None
            }
            Some(entry) if now > entry.expires_at => {
                state.remove_entry(key);
                if stats {
                    state.expired += 1;
                    state.misses += 1;
                }
                metrics::record_cache_expired(1);
                metrics::record_cache_size(state.entries.len());
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                if stats {
                    state.hits += 1;
                }
                Some(value)
            }
        }
    }

    /// Whether a live entry exists for the key.
    ///
    /// Performs the same expiry check as `get` but does not touch the
    /// hit/miss counters, only expiry accounting.
    pub fn has(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut state = self.inner.state.lock().expect("cache mutex poisoned");

        match state.entries.get(key) {
            None => false,
            Some(entry) if now > entry.expires_at => {
                state.remove_entry(key);
                if self.inner.config.enable_stats {
                    state.expired += 1;
                }
                metrics::record_cache_expired(1);
                metrics::record_cache_size(state.entries.len());
                false
            }
            Some(_) => true,
        }
    }

    /// Insert a value, evicting the oldest entry if the store is full.
    ///
    /// `ttl` falls back to the configured default.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl.unwrap_or(Duration::from_millis(self.inner.config.default_ttl_ms));
        let now = Instant::now();
        let mut state = self.inner.state.lock().expect("cache mutex poisoned");

        if state.entries.len() >= self.inner.config.max_entries {
            if let Some(evicted) = state.evict_oldest() {
                metrics::record_cache_eviction();
                tracing::debug!(key = %evicted, "Evicted oldest cache entry at capacity");
            }
        }

        // Overwrites must drop the old index position first.
        state.remove_entry(&key);

        let index_key = (now, state.next_seq);
        state.next_seq += 1;
        state.creation_index.insert(index_key, key.clone());
        state.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + ttl,
                index_key,
            },
        );
        metrics::record_cache_size(state.entries.len());
    }

    /// Remove a key. Returns whether an entry was present.
    pub fn del(&self, key: &str) -> bool {
        let mut state = self.inner.state.lock().expect("cache mutex poisoned");
        let removed = state.remove_entry(key).is_some();
        if removed {
            metrics::record_cache_size(state.entries.len());
        }
        removed
    }

    /// Empty the store and, when stats are enabled, reset all counters.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock().expect("cache mutex poisoned");
        state.entries.clear();
        state.creation_index.clear();
        if self.inner.config.enable_stats {
            state.hits = 0;
            state.misses = 0;
            state.expired = 0;
        }
        metrics::record_cache_size(0);
    }

    pub fn len(&self) -> usize {
        let state = self.inner.state.lock().expect("cache mutex poisoned");
        state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys currently stored, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        let state = self.inner.state.lock().expect("cache mutex poisoned");
        state.entries.keys().cloned().collect()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.inner.state.lock().expect("cache mutex poisoned");
        let requests = state.hits + state.misses;
        let hit_rate = if requests == 0 {
            0.0
        } else {
            state.hits as f64 / requests as f64
        };
        CacheStats {
            size: state.entries.len(),
            hit_count: state.hits,
            miss_count: state.misses,
            hit_rate,
            expired_count: state.expired,
        }
    }

    /// Stop the background sweeper. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.inner.shutdown.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_entries: usize, default_ttl_ms: u64, sweep_interval_ms: u64) -> CacheConfig {
        CacheConfig {
            enabled: true,
            default_ttl_ms,
            max_entries,
            enable_stats: true,
            sweep_interval_ms,
        }
    }

    #[tokio::test]
    async fn get_set_roundtrip_with_stats() {
        let cache: ResponseCache<String> = ResponseCache::new(config(10, 60_000, 60_000));

        assert_eq!(cache.get("a"), None);
        cache.set("a", "value".to_string(), None);
        assert_eq!(cache.get("a").as_deref(), Some("value"));

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_rate, 0.5);
        assert_eq!(stats.expired_count, 0);

        cache.shutdown();
    }

    #[tokio::test]
    async fn evicts_exactly_the_oldest_entry() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(3, 60_000, 60_000));
        cache.set("k1", 1, None);
        cache.set("k2", 2, None);
        cache.set("k3", 3, None);

        cache.set("k4", 4, None);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("k1"), None);
        assert_eq!(cache.get("k2"), Some(2));
        assert_eq!(cache.get("k3"), Some(3));
        assert_eq!(cache.get("k4"), Some(4));

        cache.shutdown();
    }

    #[tokio::test]
    async fn overwrite_refreshes_creation_order() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(3, 60_000, 60_000));
        cache.set("k1", 1, None);
        cache.set("k2", 2, None);
        cache.set("k1", 10, None);
        cache.set("k3", 3, None);

        // k2 is now the oldest entry and must be the one evicted.
        cache.set("k4", 4, None);
        assert_eq!(cache.get("k2"), None);
        assert_eq!(cache.get("k1"), Some(10));

        cache.shutdown();
    }

    #[tokio::test]
    async fn expired_read_counts_once() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(10, 30, 60_000));
        cache.set("a", 1, None);

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get("a"), None);
        let stats = cache.stats();
        assert_eq!(stats.expired_count, 1);
        assert_eq!(stats.miss_count, 1);

        // A second read is a plain miss; the entry is already gone.
        assert_eq!(cache.get("a"), None);
        let stats = cache.stats();
        assert_eq!(stats.expired_count, 1);
        assert_eq!(stats.miss_count, 2);

        cache.shutdown();
    }

    #[tokio::test]
    async fn has_only_touches_expiry_accounting() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(10, 30, 60_000));
        cache.set("a", 1, None);
        assert!(cache.has("a"));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!cache.has("a"));

        let stats = cache.stats();
        assert_eq!(stats.expired_count, 1);
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);

        cache.shutdown();
    }

    #[tokio::test]
    async fn per_entry_ttl_overrides_default() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(10, 60_000, 60_000));
        cache.set("short", 1, Some(Duration::from_millis(30)));
        cache.set("long", 2, None);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("long"), Some(2));

        cache.shutdown();
    }

    #[tokio::test]
    async fn sweeper_removes_expired_entries_proactively() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(10, 30, 50));
        cache.set("a", 1, None);
        cache.set("b", 2, None);

        tokio::time::sleep(Duration::from_millis(150)).await;

        // Swept without any read touching the entries.
        assert_eq!(cache.len(), 0);
        let stats = cache.stats();
        assert_eq!(stats.expired_count, 2);
        assert_eq!(stats.miss_count, 0);

        cache.shutdown();
    }

    #[tokio::test]
    async fn shutdown_stops_the_sweeper() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(10, 30, 50));
        cache.shutdown();
        tokio::time::sleep(Duration::from_millis(20)).await;

        cache.set("a", 1, None);
        tokio::time::sleep(Duration::from_millis(150)).await;

        // Entry expired but nothing swept it; it is still resident.
        assert_eq!(cache.len(), 1);

        cache.shutdown();
    }

    #[tokio::test]
    async fn clear_resets_counters() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(10, 60_000, 60_000));
        cache.set("a", 1, None);
        cache.get("a");
        cache.get("missing");

        cache.clear();
        assert!(cache.is_empty());
        let stats = cache.stats();
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);
        assert_eq!(stats.expired_count, 0);
        assert_eq!(stats.hit_rate, 0.0);

        cache.shutdown();
    }

    #[tokio::test]
    async fn del_and_keys() {
        let cache: ResponseCache<u32> = ResponseCache::new(config(10, 60_000, 60_000));
        cache.set("a", 1, None);
        cache.set("b", 2, None);

        let mut keys = cache.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        assert!(cache.del("a"));
        assert!(!cache.del("a"));
        assert_eq!(cache.len(), 1);

        cache.shutdown();
    }
}
