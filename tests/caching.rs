//! End-to-end caching behavior against a live mock backend.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use maps_client::api::types::{Location, RouteRequest};
use maps_client::{CallOptions, MapsClient};

mod common;

fn route_request() -> RouteRequest {
    RouteRequest::between(
        Location::coords(52.520008, 13.404954),
        Location::coords(48.137154, 11.576124),
    )
}

/// Backend that counts connections and always answers a valid route.
async fn counting_backend() -> (std::net::SocketAddr, Arc<AtomicU32>) {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let addr = common::start_mock_service(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (200, common::route_body())
        }
    })
    .await;
    (addr, call_count)
}

#[tokio::test]
async fn repeated_calls_are_served_from_cache() {
    let (addr, call_count) = counting_backend().await;
    let client = MapsClient::new(common::test_config(addr)).unwrap();
    let request = route_request();

    let first = client.route(&request).await.unwrap();
    let second = client.route(&request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(call_count.load(Ordering::SeqCst), 1, "hit must not reach the backend");

    let stats = client.cache_stats();
    assert_eq!(stats.hit_count, 1);
    assert_eq!(stats.miss_count, 1);
    assert_eq!(stats.size, 1);

    client.shutdown();
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let (addr, call_count) = counting_backend().await;
    let mut config = common::test_config(addr);
    config.cache.default_ttl_ms = 100;

    let client = MapsClient::new(config).unwrap();
    let request = route_request();

    client.route(&request).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    client.route(&request).await.unwrap();

    assert_eq!(call_count.load(Ordering::SeqCst), 2);
    assert_eq!(client.cache_stats().expired_count, 1);

    client.shutdown();
}

#[tokio::test]
async fn per_call_ttl_overrides_the_default() {
    let (addr, call_count) = counting_backend().await;
    let client = MapsClient::new(common::test_config(addr)).unwrap();
    let request = route_request();

    client
        .route_with(
            &request,
            CallOptions {
                ttl: Some(Duration::from_millis(50)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(80)).await;
    client.route(&request).await.unwrap();

    assert_eq!(call_count.load(Ordering::SeqCst), 2);

    client.shutdown();
}

#[tokio::test]
async fn invalidation_forces_a_refetch() {
    let (addr, call_count) = counting_backend().await;
    let client = MapsClient::new(common::test_config(addr)).unwrap();
    let request = route_request();

    client.route(&request).await.unwrap();
    assert!(client.invalidate_route(&request));
    client.route(&request).await.unwrap();

    assert_eq!(call_count.load(Ordering::SeqCst), 2);

    client.shutdown();
}

#[tokio::test]
async fn equivalent_requests_share_one_cache_entry() {
    let (addr, call_count) = counting_backend().await;
    let client = MapsClient::new(common::test_config(addr)).unwrap();

    let by_coords = route_request();
    let by_string = RouteRequest::between(
        Location::place("52.520008,13.404954"),
        Location::place("48.137154, 11.576124"),
    );

    client.route(&by_coords).await.unwrap();
    client.route(&by_string).await.unwrap();

    assert_eq!(
        call_count.load(Ordering::SeqCst),
        1,
        "location representation must not change the cache key"
    );

    client.shutdown();
}
