//! HTTP transport backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::schema::EndpointConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// Transport over a pooled reqwest client with a total-request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(config: &EndpointConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::network("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn classify(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            ClientError::network(error.to_string(), error)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| ClientError::network(format!("invalid method '{}'", request.method), e))?;

        let mut builder = self
            .client
            .request(method, request.url.clone())
            .header("x-request-id", request.id.to_string());
        if let Some(api_key) = &self.api_key {
            builder = builder.header("x-api-key", api_key);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        tracing::debug!(
            request_id = %request.id,
            method = %request.method,
            url = %request.url,
            "Sending request"
        );

        let response = builder.send().await.map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
