//! # HTTP API Tests for the GPU gateway
//!
//! Drive the full router (auth, validation, engine, response shapes) the way
//! a client would.
//!
//! ## Test Categories
//!
//! 1. **Public routes** - service info, health
//! 2. **Authentication** - missing, malformed, wrong and unconfigured tokens
//! 3. **Validation** - empty data, oversized data, oversized batches, bad JSON
//! 4. **Computation** - single requests, batches, failure envelopes
//! 5. **End to end** - real socket, client IP from the peer address

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use gpu_compute::{ComputeEngine, EngineConfig};
use gpu_gateway::domain::config::{CorsConfig, ServiceConfig};
use gpu_gateway::{build_router, GpuService};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

// =============================================================================
// TEST HELPERS
// =============================================================================

const TOKEN: &str = "test-token-123";

fn test_config() -> ServiceConfig {
    ServiceConfig {
        environment: "development".to_string(),
        service_token: Some(TOKEN.to_string()),
        engine: EngineConfig::default().with_simulate_delay(Duration::ZERO),
        ..ServiceConfig::default()
    }
}

fn app_with(config: ServiceConfig) -> Router {
    let engine = Arc::new(ComputeEngine::new(config.engine.clone()));
    build_router(&config, engine)
}

fn app() -> Router {
    app_with(test_config())
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

fn post_raw(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// PUBLIC ROUTES
// =============================================================================

#[tokio::test]
async fn test_root_reports_service_info() {
    let (status, body) = send(app(), get("/", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "GPU Compute Service");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["status"], "running");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let (status, body) = send(app(), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["gpu_available"], true);
    assert_eq!(body["version"], "1.0.0");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let response = app().oneshot(get("/nope", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

#[tokio::test]
async fn test_missing_token_forbidden() {
    let (status, body) = send(app(), get("/gpu-status", None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not authenticated");
}

#[tokio::test]
async fn test_non_bearer_scheme_forbidden() {
    let request = Request::builder()
        .uri("/gpu-status")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Invalid authentication credentials");
}

#[tokio::test]
async fn test_wrong_token_unauthorized() {
    let response = app()
        .oneshot(get("/gpu-status", Some("wrong")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn test_unconfigured_token_is_server_error() {
    let config = ServiceConfig {
        service_token: None,
        ..test_config()
    };
    let (status, body) = send(app_with(config), get("/gpu-status", Some("anything"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "GPU service token not configured");
}

#[tokio::test]
async fn test_auth_runs_before_body_validation() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/compute")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"data": ""}"#))
        .unwrap();
    let (status, _) = send(app(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_gpu_status_with_token() {
    let (status, body) = send(app(), get("/gpu-status", Some(TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["gpu_info"]["gpu_available"], true);
    assert_eq!(body["gpu_info"]["max_computation_time"], 30);
    assert!(body["gpu_info"]["gpu_memory_usage"]
        .as_str()
        .unwrap()
        .ends_with('%'));
    assert!(body["gpu_info"]["active_processes"].as_u64().unwrap() <= 3);
}

// =============================================================================
// VALIDATION
// =============================================================================

#[tokio::test]
async fn test_empty_data_rejected() {
    let (status, body) = send(app(), post_json("/compute", &json!({"data": ""}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "No data provided for computation");
}

#[tokio::test]
async fn test_oversized_data_rejected() {
    let data = "x".repeat(10_001);
    let (status, body) = send(app(), post_json("/compute", &json!({"data": data}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Input data too large (max 10KB)");
}

#[tokio::test]
async fn test_data_at_limit_accepted() {
    let data = "x".repeat(10_000);
    let request = post_json(
        "/compute",
        &json!({"data": data, "parameters": {"iterations": 1}}),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["computation"]["result"]["data_length"], 10_000);
}

#[tokio::test]
async fn test_malformed_json_unprocessable() {
    let (status, body) = send(app(), post_raw("/compute", "{not json".to_string())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_missing_content_type_unprocessable() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/compute")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::from(r#"{"data": "x"}"#))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_neural_network_accepts_any_echoed_values() {
    let request = post_json(
        "/compute",
        &json!({
            "data": "x",
            "parameters": {"type": "neural_network", "layers": "deep", "batch_size": 64.0}
        }),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["computation"]["success"], true);
    assert_eq!(body["computation"]["result"]["layers"], "deep");
    assert_eq!(body["computation"]["result"]["batch_size"], 64.0);
}

#[tokio::test]
async fn test_missing_data_field_unprocessable() {
    let (status, _) = send(app(), post_json("/compute", &json!({"parameters": {}}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_oversized_batch_rejected() {
    let batch: Vec<Value> = (0..11).map(|i| json!({"data": format!("item {i}")})).collect();
    let (status, body) = send(app(), post_json("/batch-compute", &json!(batch))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Batch size too large (max 10 requests)");
}

#[tokio::test]
async fn test_body_limit() {
    let body = format!(r#"{{"data": "{}"}}"#, "x".repeat(2 * 1024 * 1024));
    let mut request = post_raw("/compute", body.clone());
    request
        .headers_mut()
        .insert(header::CONTENT_LENGTH, body.len().into());

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// =============================================================================
// COMPUTATION
// =============================================================================

#[tokio::test]
async fn test_compute_matrix() {
    let mut request = post_json(
        "/compute",
        &json!({
            "data": "hello",
            "parameters": {"type": "matrix_multiplication", "matrix_size": 4}
        }),
    );
    request
        .headers_mut()
        .insert("x-forwarded-for", " 203.0.113.7 , 10.0.0.1".parse().unwrap());

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["priority"], "normal");
    assert_eq!(body["client_ip"], "203.0.113.7");

    let computation = &body["computation"];
    assert_eq!(computation["success"], true);
    assert_eq!(computation["gpu_used"], true);
    assert_eq!(computation["result"]["operation"], "matrix_multiplication");
    assert_eq!(computation["result"]["input_data"], "hello");
    assert_eq!(computation["result"]["matrix_size"], "4x4");
    assert_eq!(computation["result"]["result_shape"], json!([4, 4]));
    assert_eq!(computation["result"]["flops"], 128);
    assert!(computation["request_id"].is_string());
    assert!(computation["computation_time"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_compute_without_peer_reports_unknown_client() {
    let request = post_json("/compute", &json!({"data": "x", "priority": "high"}));
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["client_ip"], "unknown");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["computation"]["result"]["operation"], "default_computation");
}

#[tokio::test]
async fn test_invalid_parameter_is_failure_envelope() {
    let request = post_json(
        "/compute",
        &json!({"data": "x", "parameters": {"type": "image_processing", "width": "wide"}}),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["computation"]["success"], false);
    assert_eq!(body["computation"]["gpu_used"], false);
    assert!(body["computation"]["error"]
        .as_str()
        .unwrap()
        .contains("width"));
    assert!(body["computation"].get("result").is_none());
}

#[tokio::test]
async fn test_batch_preserves_order_and_counts() {
    let batch = json!([
        {"data": "first", "parameters": {"type": "matrix_multiplication", "matrix_size": 2}},
        {"data": "second", "parameters": {"type": "matrix_multiplication", "matrix_size": -3}},
        {"data": "", "parameters": {"iterations": 5}},
    ]);
    let (status, body) = send(app(), post_json("/batch-compute", &batch)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["total_requests"], 3);
    // Every item ran to completion, including the rejected matrix size
    assert_eq!(body["successful"], 3);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["client_ip"], "unknown");

    let results = body["results"].as_array().unwrap();
    for (position, entry) in results.iter().enumerate() {
        assert_eq!(entry["index"], position);
        assert_eq!(entry["success"], true);
    }
    assert_eq!(results[0]["result"]["result"]["input_data"], "first");
    assert_eq!(results[1]["result"]["success"], false);
    assert!(results[1]["result"]["error"]
        .as_str()
        .unwrap()
        .contains("matrix_size"));
    // Batch items are not validated individually
    assert_eq!(results[2]["result"]["result"]["data_length"], 0);
}

#[tokio::test]
async fn test_empty_batch() {
    let (status, body) = send(app(), post_json("/batch-compute", &json!([]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_requests"], 0);
    assert_eq!(body["results"], json!([]));
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_preflight_skips_auth() {
    let config = ServiceConfig {
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
            ..CorsConfig::default()
        },
        ..test_config()
    };
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/compute")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app_with(config).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
}

// =============================================================================
// END TO END
// =============================================================================

#[tokio::test]
async fn test_served_over_tcp() {
    let service = Arc::new(GpuService::new(test_config()).unwrap());
    let shutdown = service.shutdown_handle();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.serve(listener).await })
    };

    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");

    let response = client
        .post(format!("http://{addr}/compute"))
        .bearer_auth(TOKEN)
        .json(&json!({"data": "over the wire", "parameters": {"iterations": 10}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["client_ip"], "127.0.0.1");
    assert_eq!(body["computation"]["result"]["iterations"], 10);

    shutdown.shutdown();
    server.await.unwrap().unwrap();
}
