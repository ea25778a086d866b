//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call:
//!     → retry.rs (attempt, classify failure, decide whether to retry)
//!     → backoff.rs (compute the jittered delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Retryability is decided by matching error variants, never message text
//! - Connection-level failures retryable by config; upstream statuses by
//!   an explicit allow-list
//! - Jittered backoff prevents thundering herd

pub mod backoff;
pub mod retry;

pub use retry::RetryPolicy;
