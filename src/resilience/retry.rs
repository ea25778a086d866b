//! Retry logic.
//!
//! # Responsibilities
//! - Wrap a single outbound call with bounded retry-with-backoff
//! - Classify failures into retryable and terminal
//! - Rethrow terminal errors unchanged, immediately

use std::future::Future;

use crate::config::schema::RetryConfig;
use crate::error::{ClientError, ClientResult};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Bounded retry-with-backoff around one outbound operation.
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Whether a failure is worth another attempt.
    fn is_retryable(&self, error: &ClientError) -> bool {
        match error {
            ClientError::Network { .. } | ClientError::Timeout { .. } => {
                self.config.retry_on_network_error
            }
            ClientError::Upstream { status, .. } => {
                self.config.retryable_status_codes.contains(status)
            }
            _ => false,
        }
    }

    /// Run `op`, retrying retryable failures up to `max_retries` times.
    ///
    /// Worst case the operation runs `max_retries + 1` times. The last
    /// error, retryable or not, reaches the caller unchanged.
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut op: F) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let mut attempt: u32 = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.config.max_retries || !self.is_retryable(&error) {
                        return Err(error);
                    }

                    attempt += 1;
                    let delay = calculate_backoff(
                        attempt,
                        self.config.base_ms,
                        self.config.factor,
                        self.config.max_delay_ms,
                    );
                    tracing::debug!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying after backoff"
                    );
                    metrics::record_retry(operation);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
