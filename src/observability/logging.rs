//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for applications and tests
//! - Fall back to a sensible default filter when RUST_LOG is unset
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Library code only emits events; subscriber setup is opt-in

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with an env-filter.
///
/// `default_directive` is used when `RUST_LOG` is not set, e.g.
/// `"maps_client=debug"`. Calling this twice returns an error from the
/// subscriber registry; embedding applications that install their own
/// subscriber should skip it.
pub fn init_logging(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
