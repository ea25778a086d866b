//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use maps_client::api::types::{Route, RouteResponse};
use maps_client::config::ClientConfig;

/// Start a programmable mock mapping backend on an ephemeral port.
///
/// The closure decides the status and body of each response, in order of
/// connection arrival. Returns the bound address.
pub async fn start_mock_service<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering.
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A well-formed single-route response body.
pub fn route_body() -> String {
    serde_json::to_string(&RouteResponse {
        routes: vec![Route {
            distance_m: 584_000.0,
            duration_s: 19_800.0,
            geometry: None,
            legs: Vec::new(),
        }],
    })
    .unwrap()
}

/// Client config pointed at a mock backend, with fast test timings.
pub fn test_config(addr: SocketAddr) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.endpoint.base_url = format!("http://{}", addr);
    config.endpoint.timeout_ms = 2000;
    config.retry.base_ms = 20;
    config.retry.max_delay_ms = Some(100);
    config.rate_limit.refill_interval_ms = 60_000;
    config.cache.sweep_interval_ms = 60_000;
    config
}
