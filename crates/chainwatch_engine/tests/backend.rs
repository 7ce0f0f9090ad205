use std::time::Duration;

use chainwatch_core::{HealthCondition, JobId, Mode};
use chainwatch_engine::{
    check_health, Backend, BackendSettings, FailureKind, JobStatusKind, ReqwestBackend,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("backend")
}

#[tokio::test]
async fn health_maps_backend_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "w3_connected": false,
            "ai_loaded": true,
            "model_enabled": true
        })))
        .mount(&server)
        .await;

    let status = check_health(&backend_for(&server)).await;
    assert!(!status.backend_reachable);
    assert_eq!(status.condition(), Some(HealthCondition::BackendUnreachable));
}

#[tokio::test]
async fn unreachable_server_reads_as_backend_unreachable() {
    // Nothing listens on the discard port.
    let backend = ReqwestBackend::new(BackendSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
    })
    .expect("backend");

    let status = check_health(&backend).await;
    assert_eq!(status.condition(), Some(HealthCondition::BackendUnreachable));
}

#[tokio::test]
async fn options_are_requested_per_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/options"))
        .and(query_param("mode", "realtime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "options": [
                {
                    "id": 1,
                    "name": "Real-Time Stream Detection",
                    "description": "Detect fraud as transactions occur",
                    "processing_stage": "Real-Time",
                    "storage_type": "PostgreSQL (Immediate)",
                    "best_for": "Active monitoring"
                }
            ]
        })))
        .mount(&server)
        .await;

    let options = backend_for(&server)
        .options(Mode::Realtime)
        .await
        .expect("options");
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].id, 1);
    assert_eq!(options[0].processing_stage.as_deref(), Some("Real-Time"));
    assert_eq!(options[0].extra.get("best_for"), Some(&json!("Active monitoring")));
}

#[tokio::test]
async fn missing_option_list_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let options = backend_for(&server)
        .options(Mode::Scheduled)
        .await
        .expect("options");
    assert!(options.is_empty());
}

#[tokio::test]
async fn error_body_is_folded_into_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/options"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Database unavailable",
            "details": "connection refused"
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .options(Mode::Scheduled)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.message, "Database unavailable - connection refused");
}

#[tokio::test]
async fn job_status_is_read_from_job_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/transactions/job/abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "running" })))
        .mount(&server)
        .await;

    let status = backend_for(&server)
        .job_status(&JobId::new("abc-123"))
        .await
        .expect("status");
    assert_eq!(status.status, JobStatusKind::Unknown);
    assert_eq!(status.result, None);
}

#[tokio::test]
async fn model_toggle_posts_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/model-toggle"))
        .and(body_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "model_enabled": false })))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server)
        .toggle_model(false)
        .await
        .expect("toggle");
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dashboard/api/transaction/0xabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tx_hash": "0xabc" })))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: format!("{}/dashboard", server.uri()),
        ..BackendSettings::default()
    })
    .expect("backend");
    let detail = backend.record_detail("0xabc").await.expect("detail");
    assert_eq!(detail, json!({ "tx_hash": "0xabc" }));
}

#[tokio::test]
async fn non_json_success_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server).stats().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestBackend::new(BackendSettings {
        base_url: "not a url".to_string(),
        ..BackendSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
