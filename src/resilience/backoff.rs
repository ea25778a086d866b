//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

/// Calculate the exponential backoff delay before retry `attempt` (1-based).
///
/// The delay grows as `base_ms * factor^(attempt-1)`, is capped at `max_ms`
/// when set, and then gains uniform jitter of up to 10% of the capped value.
pub fn calculate_backoff(attempt: u32, base_ms: u64, factor: f64, max_ms: Option<u64>) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential = factor.powi(attempt.saturating_sub(1) as i32);
    let delay_ms = (base_ms as f64 * exponential).min(u64::MAX as f64) as u64;
    let capped_delay = match max_ms {
        Some(max) => delay_ms.min(max),
        None => delay_ms,
    };

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
