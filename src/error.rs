//! Client error types.
//!
//! # Responsibilities
//! - Represent every failure the client can surface as a tagged variant
//! - Carry enough metadata (status, code, field, cause) for callers to
//!   decide whether to retry externally
//! - Drive retry classification without inspecting message text
//!
//! # Design Decisions
//! - One crate-wide enum; config loading has its own error type
//! - Rate-limit rejection is a distinct variant, never a wrapped 429
//! - Upstream statuses are mapped to a coarse error code once, at the
//!   classification site

use thiserror::Error;

/// Result alias used throughout the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the maps client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A request failed field-level validation before dispatch.
    #[error("invalid field '{field}': {message}")]
    Validation { field: String, message: String },

    /// The local admission check rejected the request.
    #[error("rate limit exceeded, request rejected before dispatch")]
    RateLimited,

    /// A network-level failure (connection refused/reset, DNS, transport).
    #[error("network failure: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The outbound call did not settle within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The remote service answered with an error status.
    #[error("upstream returned {status} ({code})")]
    Upstream { status: u16, code: UpstreamCode },

    /// A success response carried a body the client could not decode.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Build a network error from any transport-level cause.
    pub fn network(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build an upstream error, deriving the error code from the status.
    pub fn upstream(status: u16) -> Self {
        Self::Upstream {
            status,
            code: UpstreamCode::from_status(status),
        }
    }

    /// HTTP-style status metadata for this error, if it has any.
    ///
    /// Network failures report 0 (no response was received).
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => None,
            Self::RateLimited => Some(429),
            Self::Network { .. } => Some(0),
            Self::Timeout { .. } => Some(408),
            Self::Upstream { status, .. } => Some(*status),
            Self::Decode(_) => None,
        }
    }
}

/// Coarse classification of upstream error statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamCode {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    ServerError,
    ServiceUnavailable,
    HttpError,
}

impl UpstreamCode {
    /// Map an HTTP status to its error code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500 => Self::ServerError,
            502 | 503 | 504 => Self::ServiceUnavailable,
            _ => Self::HttpError,
        }
    }
}

impl std::fmt::Display for UpstreamCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::ServerError => "SERVER_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::HttpError => "HTTP_ERROR",
        };
        write!(f, "{}", code)
    }
}
