//! Outbound transport subsystem.
//!
//! # Data Flow
//! ```text
//! Built request {method, url, headers, body}
//!     → Transport::send
//!     → {status, headers, body} or a network-level failure
//! ```
//!
//! # Design Decisions
//! - The transport reports only network-level failures (connection,
//!   DNS, timeout); status classification belongs to the orchestrator
//! - Every request carries a generated request ID for log correlation
//! - The trait seam exists so tests can substitute a scripted transport

pub mod http;

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use crate::error::ClientResult;

pub use http::HttpTransport;

/// An outbound HTTP request, already fully built.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Correlation ID, attached as the `x-request-id` header.
    pub id: Uuid,
    pub method: String,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl TransportRequest {
    pub fn get(url: Url) -> Self {
        Self {
            id: Uuid::new_v4(),
            method: "GET".to_string(),
            url,
            headers: Vec::new(),
            body: None,
        }
    }
}

/// An upstream response, body fully read.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Sends requests to the remote service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request, returning the response or a network-level failure.
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse>;
}
