// Runtime configuration updates through a live gateway

use std::collections::HashMap;

use serde_json::{json, Value};

use sekisho::cache::CacheConfigUpdate;
use sekisho::config::{GatewayConfigUpdate, RetryConfig};
use sekisho::{ApiResponse, RequestOptions};

use super::test_harness::{default_config, gateway_with, json_response, TestBackend};

#[tokio::test]
async fn test_base_url_update_retargets_without_reconstruction() {
    let backend = TestBackend::new();
    backend.stub_json("/procedures", 200, json!([]));
    let gateway = gateway_with(default_config(), backend.clone());

    let first: ApiResponse = gateway.get("/procedures", RequestOptions::new()).await;
    assert!(first.success);

    gateway.update_config(
        GatewayConfigUpdate {
            base_url: Some("https://new.example.com".to_string()),
            ..Default::default()
        },
        None,
    );

    // Same path on the new host; the backend routes by path, so dispatch
    // count proves a second network call went out (cache keys are per-URL)
    let second: ApiResponse = gateway.get("/procedures", RequestOptions::new()).await;
    assert!(second.success);
    assert_eq!(backend.dispatches_to("/procedures"), 2);
}

#[tokio::test]
async fn test_enabling_debug_at_runtime_starts_diagnostics() {
    let backend = TestBackend::new();
    backend.stub_json("/news", 200, json!([]));
    let gateway = gateway_with(default_config(), backend);

    let _: ApiResponse<Value> = gateway.get("/news", RequestOptions::new()).await;
    assert!(gateway.diagnostics().endpoints.is_empty());

    gateway.update_config(
        GatewayConfigUpdate {
            debug: Some(true),
            ..Default::default()
        },
        None,
    );

    gateway.clear_cache();
    let _: ApiResponse<Value> = gateway.get("/news", RequestOptions::new()).await;
    assert_eq!(gateway.diagnostics().total_requests, 1);
}

#[tokio::test]
async fn test_retry_policy_can_be_installed_at_runtime() {
    let backend = TestBackend::new();
    backend.stub_sequence("/flaky", vec![json_response(503, json!({}))]);
    let gateway = gateway_with(default_config(), backend.clone());

    let _: ApiResponse<Value> = gateway.get("/flaky", RequestOptions::new()).await;
    assert_eq!(backend.dispatches_to("/flaky"), 1);

    gateway.update_config(
        GatewayConfigUpdate {
            retry: Some(RetryConfig {
                max_retries: 2,
                retry_delay_ms: 1,
                max_retry_delay_ms: 5,
                ..Default::default()
            }),
            ..Default::default()
        },
        None,
    );

    let _: ApiResponse<Value> = gateway.get("/flaky", RequestOptions::new()).await;
    assert_eq!(backend.dispatches_to("/flaky"), 4, "second call retried twice");
}

#[tokio::test]
async fn test_header_replacement_keeps_content_type() {
    let backend = TestBackend::new();
    backend.stub_json("/events", 200, json!([]));
    let gateway = gateway_with(default_config(), backend);

    gateway.update_config(
        GatewayConfigUpdate {
            default_headers: Some(HashMap::from([(
                "Authorization".to_string(),
                "Bearer rotated".to_string(),
            )])),
            ..Default::default()
        },
        None,
    );

    // The replaced header set still sits on top of the implicit Content-Type;
    // end-to-end visibility of both is asserted in the gateway unit tests,
    // here we only prove the update path keeps the gateway operational
    let response: ApiResponse = gateway.get("/events", RequestOptions::new()).await;
    assert!(response.success);
}

#[tokio::test]
async fn test_cache_partial_travels_with_config_update() {
    let backend = TestBackend::new();
    backend.stub_json("/growth", 200, json!({"series": []}));
    let gateway = gateway_with(default_config(), backend.clone());

    let _: ApiResponse<Value> = gateway.get("/growth", RequestOptions::new()).await;
    let _: ApiResponse<Value> = gateway.get("/growth", RequestOptions::new()).await;
    assert_eq!(backend.dispatches_to("/growth"), 1);

    gateway.update_config(
        GatewayConfigUpdate::default(),
        Some(CacheConfigUpdate {
            enabled: Some(false),
            ..Default::default()
        }),
    );

    let _: ApiResponse<Value> = gateway.get("/growth", RequestOptions::new()).await;
    let _: ApiResponse<Value> = gateway.get("/growth", RequestOptions::new()).await;
    assert_eq!(backend.dispatches_to("/growth"), 3, "caching disabled live");
}
