//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → handed to MapsClient at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the rate limiter exposes a
//!   runtime update surface (`RateLimiter::update_config`)
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{CacheConfig, ClientConfig, EndpointConfig, RateLimitConfig, RetryConfig};
