//! Token-bucket admission control.
//!
//! # Responsibilities
//! - Decide whether an outbound call may proceed now (`acquire`)
//! - Let callers wait for capacity with a hard deadline (`wait_for_tokens`)
//! - Expose runtime reconfiguration without dropping waiters
//!
//! # Design Decisions
//! - Refill is lazy: computed on every acquire/read, so the limiter owns no
//!   background task and has nothing to leak
//! - Waiters sleep until the next whole refill interval (or their deadline)
//!   on a `Notify`, not on a fixed poll interval
//! - Whole intervals only: crediting discards the fractional remainder of
//!   the current interval and restarts the refill clock at "now". This
//!   under-credits slightly versus a precise bucket and is kept for
//!   compatibility with existing deployments.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::Notify;

use crate::config::schema::{RateLimitConfig, RateLimitUpdate};

/// Token bucket state. Mutated only under the limiter's mutex.
#[derive(Debug)]
struct Bucket {
    config: RateLimitConfig,
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    fn new(config: RateLimitConfig) -> Self {
        let tokens = effective_capacity(&config);
        Self {
            config,
            tokens,
            last_refill: Instant::now(),
        }
    }

    /// Credit whole elapsed intervals and restart the refill clock.
    fn refill(&mut self, now: Instant) {
        let interval = Duration::from_millis(self.config.refill_interval_ms);
        let elapsed = now.duration_since(self.last_refill);
        if interval.is_zero() || elapsed < interval {
            return;
        }

        let intervals_passed = (elapsed.as_millis() / interval.as_millis()) as f64;
        let capacity = effective_capacity(&self.config);
        self.tokens = (self.tokens + intervals_passed * self.config.refill_rate).min(capacity);
        self.last_refill = now;
    }

    /// Time until the next refill would credit tokens.
    fn until_next_refill(&self, now: Instant) -> Duration {
        let interval = Duration::from_millis(self.config.refill_interval_ms);
        interval.saturating_sub(now.duration_since(self.last_refill))
    }
}

/// Tokens the bucket may hold under the current configuration.
fn effective_capacity(config: &RateLimitConfig) -> f64 {
    if config.allow_burst {
        config.capacity
    } else {
        config.refill_rate.min(config.capacity)
    }
}

struct LimiterInner {
    bucket: Mutex<Bucket>,
    notify: Notify,
}

/// Token-bucket rate limiter shared across all calls of one client.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<LimiterInner>,
}

impl RateLimiter {
    /// Create a limiter with a full bucket.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            inner: Arc::new(LimiterInner {
                bucket: Mutex::new(Bucket::new(config)),
                notify: Notify::new(),
            }),
        }
    }

    /// Try to consume `n` tokens without waiting.
    ///
    /// Refills lazily first. On failure the bucket is left unchanged.
    pub fn acquire(&self, n: f64) -> bool {
        let mut bucket = self.inner.bucket.lock().expect("rate limiter mutex poisoned");
        bucket.refill(Instant::now());

        if bucket.tokens >= n {
            bucket.tokens -= n;
            true
        } else {
            false
        }
    }

    /// Wait until `n` tokens can be consumed or the timeout elapses.
    ///
    /// Returns false on timeout without having consumed tokens. Wakeups are
    /// scheduled for the next whole refill interval, and configuration
    /// changes wake all waiters early.
    pub async fn wait_for_tokens(&self, n: f64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            if self.acquire(n) {
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            let until_refill = {
                let bucket = self.inner.bucket.lock().expect("rate limiter mutex poisoned");
                bucket.until_next_refill(now)
            };
            let wait = until_refill.min(deadline - now).max(Duration::from_millis(1));
            let _ = tokio::time::timeout(wait, self.inner.notify.notified()).await;
        }
    }

    /// Fill the bucket to capacity and restart the refill clock.
    pub fn reset(&self) {
        {
            let mut bucket = self.inner.bucket.lock().expect("rate limiter mutex poisoned");
            bucket.tokens = effective_capacity(&bucket.config);
            bucket.last_refill = Instant::now();
        }
        self.inner.notify.notify_waiters();
    }

    /// Current token count after a refill computation. Read-only.
    pub fn token_count(&self) -> f64 {
        let mut bucket = self.inner.bucket.lock().expect("rate limiter mutex poisoned");
        bucket.refill(Instant::now());
        bucket.tokens
    }

    /// Merge a partial configuration update and restart refill scheduling.
    ///
    /// Tokens above the new effective capacity are dropped; waiters are
    /// woken so they pick up the new interval.
    pub fn update_config(&self, update: &RateLimitUpdate) {
        {
            let mut bucket = self.inner.bucket.lock().expect("rate limiter mutex poisoned");
            bucket.config.apply(update);
            bucket.tokens = bucket.tokens.min(effective_capacity(&bucket.config));
            bucket.last_refill = Instant::now();
        }
        self.inner.notify.notify_waiters();
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> RateLimitConfig {
        let bucket = self.inner.bucket.lock().expect("rate limiter mutex poisoned");
        bucket.config.clone()
    }
}
