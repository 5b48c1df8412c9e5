// End-to-end cache behavior through the gateway surface

use std::time::Duration;

use serde_json::{json, Value};

use sekisho::cache::CacheConfig;
use sekisho::{ApiResponse, RequestOptions};

use super::test_harness::{default_config, gateway_with, TestBackend};

#[tokio::test]
async fn test_first_call_misses_second_call_hits() {
    let backend = TestBackend::new();
    backend.stub_json("/users/1", 200, json!({"id": 1, "name": "Test"}));
    let gateway = gateway_with(default_config(), backend.clone());

    let first: ApiResponse = gateway.get("/users/1", RequestOptions::new()).await;
    assert!(first.success);
    assert_eq!(first.data, Some(json!({"id": 1, "name": "Test"})));

    let second: ApiResponse = gateway.get("/users/1", RequestOptions::new()).await;
    assert!(second.success);
    assert_eq!(second.data, first.data);

    assert_eq!(backend.dispatches_to("/users/1"), 1);

    let stats = gateway.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_cached_entry_expires_after_ttl() {
    let backend = TestBackend::new();
    backend.stub_json("/news", 200, json!([{"title": "a"}]));

    let mut config = default_config();
    config.cache = CacheConfig {
        ttl_ms: 30,
        ..Default::default()
    };
    let gateway = gateway_with(config, backend.clone());

    let _: ApiResponse = gateway.get("/news", RequestOptions::new()).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let _: ApiResponse = gateway.get("/news", RequestOptions::new()).await;

    assert_eq!(backend.dispatches_to("/news"), 2);
    assert_eq!(gateway.cache_stats().expired, 1);
}

#[tokio::test]
async fn test_param_order_does_not_split_cache_entries() {
    let backend = TestBackend::new();
    backend.stub_json("/procedures", 200, json!([]));
    let gateway = gateway_with(default_config(), backend.clone());

    let forward = RequestOptions::new()
        .with_param("industry", "dental")
        .with_param("page", "1");
    let reversed = RequestOptions::new()
        .with_param("page", "1")
        .with_param("industry", "dental");

    let _: ApiResponse = gateway.get("/procedures", forward).await;
    let _: ApiResponse = gateway.get("/procedures", reversed).await;

    assert_eq!(
        backend.dispatches_to("/procedures"),
        1,
        "structurally equal requests must share a cache entry"
    );
}

#[tokio::test]
async fn test_non_get_caching_opt_in() {
    let backend = TestBackend::new();
    backend.stub_json("/search", 200, json!({"results": []}));

    let mut config = default_config();
    config.cache = CacheConfig {
        cache_non_get: true,
        ..Default::default()
    };
    let gateway = gateway_with(config, backend.clone());

    let body = json!({"query": "implant market"});
    let _: ApiResponse = gateway
        .post("/search", Some(body.clone()), RequestOptions::new())
        .await;
    let _: ApiResponse = gateway.post("/search", Some(body), RequestOptions::new()).await;

    assert_eq!(backend.dispatches_to("/search"), 1);
}

#[tokio::test]
async fn test_different_bodies_are_distinct_entries() {
    let backend = TestBackend::new();
    backend.stub_json("/search", 200, json!({"results": []}));

    let mut config = default_config();
    config.cache = CacheConfig {
        cache_non_get: true,
        ..Default::default()
    };
    let gateway = gateway_with(config, backend.clone());

    let _: ApiResponse = gateway
        .post("/search", Some(json!({"query": "a"})), RequestOptions::new())
        .await;
    let _: ApiResponse = gateway
        .post("/search", Some(json!({"query": "b"})), RequestOptions::new())
        .await;

    assert_eq!(backend.dispatches_to("/search"), 2);
}

#[tokio::test]
async fn test_clear_cache_is_unconditional() {
    let backend = TestBackend::new();
    backend.stub_json("/a", 200, json!(1));
    backend.stub_json("/b", 200, json!(2));
    let gateway = gateway_with(default_config(), backend.clone());

    let _: ApiResponse<Value> = gateway.get("/a", RequestOptions::new()).await;
    let _: ApiResponse<Value> = gateway.get("/b", RequestOptions::new()).await;
    assert_eq!(gateway.cache_stats().entries, 2);

    gateway.clear_cache();
    assert_eq!(gateway.cache_stats().entries, 0);

    let _: ApiResponse<Value> = gateway.get("/a", RequestOptions::new()).await;
    assert_eq!(backend.dispatches_to("/a"), 2);
}
