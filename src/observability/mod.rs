//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The crate records through the `metrics` facade and never installs a
//!   recorder or exporter itself
//! - Metrics are cheap (atomic increments); helpers keep label names in
//!   one place

pub mod logging;
pub mod metrics;
