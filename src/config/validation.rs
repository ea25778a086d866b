//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, factor >= 1)
//! - Check the base URL parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the client

use crate::config::schema::ClientConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn error(field: &str, message: &str) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.endpoint.base_url).is_err() {
        errors.push(error("endpoint.base_url", "must be a valid URL"));
    }
    if config.endpoint.timeout_ms == 0 {
        errors.push(error("endpoint.timeout_ms", "must be greater than zero"));
    }

    if config.cache.max_entries == 0 {
        errors.push(error("cache.max_entries", "must be greater than zero"));
    }
    if config.cache.default_ttl_ms == 0 {
        errors.push(error("cache.default_ttl_ms", "must be greater than zero"));
    }
    if config.cache.sweep_interval_ms == 0 {
        errors.push(error("cache.sweep_interval_ms", "must be greater than zero"));
    }

    if config.retry.factor < 1.0 {
        errors.push(error("retry.factor", "must be at least 1"));
    }
    if config.retry.base_ms == 0 {
        errors.push(error("retry.base_ms", "must be greater than zero"));
    }

    if config.rate_limit.capacity <= 0.0 {
        errors.push(error("rate_limit.capacity", "must be greater than zero"));
    }
    if config.rate_limit.refill_rate <= 0.0 {
        errors.push(error("rate_limit.refill_rate", "must be greater than zero"));
    }
    if config.rate_limit.refill_interval_ms == 0 {
        errors.push(error("rate_limit.refill_interval_ms", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
