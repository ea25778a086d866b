//! Resilient client for a remote mapping service.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 MAPS CLIENT                   │
//!                    │                                               │
//!   route/matrix/    │  ┌──────────┐   ┌─────────┐   ┌───────────┐  │
//!   snap request ────┼─▶│ validate │──▶│  cache  │──▶│  limiter  │  │
//!                    │  └──────────┘   │ lookup  │   │ acquire(1)│  │
//!                    │                 └─────────┘   └─────┬─────┘  │
//!                    │                      ▲               │        │
//!                    │                      │               ▼        │
//!   typed result     │                 ┌─────────┐   ┌───────────┐  │
//!   ◀────────────────┼─────────────────│  cache  │◀──│   retry   │◀─┼── Transport
//!                    │                 │populate │   │ + backoff │  │   (HTTP)
//!                    │                 └─────────┘   └───────────┘  │
//!                    │                                               │
//!                    │  ┌────────────────────────────────────────┐  │
//!                    │  │          Cross-Cutting Concerns         │  │
//!                    │  │   config · observability · errors       │  │
//!                    │  └────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! A cache hit returns without touching the rate limiter or the retry
//! policy; a rate-limit rejection fails fast before any transport work.

// Core subsystems
pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod limiter;
pub mod resilience;
pub mod transport;

// Cross-cutting concerns
pub mod observability;

pub use api::{
    Location, MatrixRequest, MatrixResponse, RouteRequest, RouteResponse, SnapRequest,
    SnapResponse, TravelMode,
};
pub use cache::{CacheStats, ResponseCache};
pub use client::{CallOptions, MapsClient};
pub use config::{load_config, ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult, UpstreamCode};
pub use limiter::RateLimiter;
pub use resilience::RetryPolicy;
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
