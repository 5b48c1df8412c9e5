// Retry, backoff, and connection health behavior through the gateway surface

use std::time::Instant;

use serde_json::{json, Value};

use sekisho::config::RetryConfig;
use sekisho::{ApiResponse, RequestOptions};

use super::test_harness::{
    default_config, gateway_with, json_response, network_error, TestBackend,
};

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        retry_delay_ms: 1,
        max_retry_delay_ms: 10,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_persistent_failure_exhausts_exactly_max_retries() {
    let backend = TestBackend::new();
    backend.stub_sequence("/flaky", vec![json_response(503, json!({}))]);

    let mut config = default_config();
    config.retry = Some(fast_retry(3));
    let gateway = gateway_with(config, backend.clone());

    let response: ApiResponse = gateway.get("/flaky", RequestOptions::new()).await;

    assert!(!response.success);
    assert_eq!(response.status, 503);
    assert_eq!(backend.dispatches_to("/flaky"), 4, "1 initial + 3 retries");
}

#[tokio::test]
async fn test_transient_failure_recovers_within_ceiling() {
    let backend = TestBackend::new();
    backend.stub_sequence(
        "/recovering",
        vec![
            json_response(502, json!({})),
            network_error(),
            json_response(200, json!({"ok": true})),
        ],
    );

    let mut config = default_config();
    config.retry = Some(fast_retry(5));
    let gateway = gateway_with(config, backend.clone());

    let response: ApiResponse = gateway.get("/recovering", RequestOptions::new()).await;

    assert!(response.success);
    assert_eq!(response.data, Some(json!({"ok": true})));
    assert_eq!(backend.dispatches_to("/recovering"), 3);
}

#[tokio::test]
async fn test_backoff_delays_accumulate_between_dispatches() {
    let backend = TestBackend::new();
    backend.stub_sequence("/slow", vec![json_response(503, json!({}))]);

    let mut config = default_config();
    config.retry = Some(RetryConfig {
        max_retries: 3,
        retry_delay_ms: 20,
        max_retry_delay_ms: 200,
        ..Default::default()
    });
    let gateway = gateway_with(config, backend);

    let start = Instant::now();
    let _: ApiResponse = gateway.get("/slow", RequestOptions::new()).await;
    let elapsed = start.elapsed().as_millis() as u64;

    // Minimum total backoff: 20 + 40 + 80 = 140ms (jitter only adds)
    assert!(elapsed >= 140, "expected >= 140ms of backoff, got {elapsed}ms");
}

#[tokio::test]
async fn test_client_error_without_policy_fails_once() {
    let backend = TestBackend::new();
    backend.stub_sequence("/down", vec![network_error()]);
    let gateway = gateway_with(default_config(), backend.clone());

    let response: ApiResponse = gateway.get("/down", RequestOptions::new()).await;

    assert!(!response.success);
    assert_eq!(response.status, 500);
    let error = response.error.unwrap();
    assert_eq!(error.code, "UNKNOWN_ERROR");
    assert_eq!(backend.dispatches_to("/down"), 1);
}

#[tokio::test]
async fn test_structured_error_body_reaches_the_caller() {
    let backend = TestBackend::new();
    backend.stub_json(
        "/companies",
        404,
        json!({"message": "Not Found", "code": "RESOURCE_NOT_FOUND"}),
    );
    let gateway = gateway_with(default_config(), backend);

    let response: ApiResponse = gateway
        .post("/companies", Some(json!({"name": "x"})), RequestOptions::new())
        .await;

    assert!(!response.success);
    assert_eq!(response.status, 404);
    assert_eq!(response.data, None);

    let error = response.error.unwrap();
    assert_eq!(error.message, "Not Found");
    assert_eq!(error.code, "RESOURCE_NOT_FOUND");
    assert_eq!(
        error.details,
        Some(json!({"message": "Not Found", "code": "RESOURCE_NOT_FOUND"}))
    );
}

#[tokio::test]
async fn test_failures_count_against_connection_health() {
    let backend = TestBackend::new();
    backend.stub_json("/up", 200, json!({}));
    backend.stub_sequence("/down", vec![network_error()]);

    let gateway = gateway_with(default_config(), backend);

    let _: ApiResponse<Value> = gateway.get("/up", RequestOptions::new()).await;
    let _: ApiResponse<Value> = gateway.get("/down", RequestOptions::new()).await;
    let _: ApiResponse<Value> = gateway.get("/down?retry=1", RequestOptions::new()).await;

    let status = gateway.connection_status();
    assert_eq!(status.failed_request_count, 2);
    // The recent success keeps the verdict online
    assert!(status.is_online);

    gateway.reset_connection();
    let status = gateway.connection_status();
    assert_eq!(status.failed_request_count, 0);
    assert_eq!(status.time_since_last_success_ms, 0);
}

#[tokio::test]
async fn test_debug_diagnostics_segment_by_path_without_query() {
    let backend = TestBackend::new();
    backend.stub_json("/trending", 200, json!([]));
    backend.stub_sequence("/stats", vec![json_response(500, json!({}))]);

    let mut config = default_config();
    config.debug = true;
    let gateway = gateway_with(config, backend);

    let _: ApiResponse<Value> = gateway
        .get("/trending", RequestOptions::new().with_param("window", "7d"))
        .await;
    let _: ApiResponse<Value> = gateway.get("/trending", RequestOptions::new()).await;
    let _: ApiResponse<Value> = gateway.get("/stats", RequestOptions::new()).await;

    let summary = gateway.diagnostics();
    assert_eq!(summary.endpoints.len(), 2);
    assert_eq!(summary.total_errors, 1);

    let stats = summary
        .endpoints
        .iter()
        .find(|r| r.endpoint == "/stats")
        .unwrap();
    assert!((stats.error_rate - 100.0).abs() < f64::EPSILON);
    assert_eq!(stats.last_error.as_ref().unwrap().status, Some(500));
}
