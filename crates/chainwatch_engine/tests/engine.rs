use std::sync::Arc;
use std::time::Duration;

use chainwatch_core::{HealthStatus, JobRequest, Mode};
use chainwatch_engine::{
    BackendSettings, EngineCommand, EngineEvent, EngineHandle, FailureKind, PollSettings,
    ReqwestBackend, TokioClock,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> (EngineHandle, tokio::sync::mpsc::UnboundedReceiver<EngineEvent>) {
    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("backend");
    EngineHandle::new(
        Arc::new(backend),
        Arc::new(TokioClock),
        PollSettings {
            poll_interval: Duration::from_millis(10),
            max_wait: Duration::from_secs(5),
        },
    )
}

#[tokio::test]
async fn enqueued_job_reports_back_with_its_epoch() {
    chainwatch_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transactions/async"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "j1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/transactions/job/j1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "complete",
            "result": { "transactions": [{ "tx_hash": "0x1" }] }
        })))
        .mount(&server)
        .await;

    let (engine, mut events) = engine_for(&server);
    engine.enqueue(EngineCommand::SubmitJob {
        epoch: 7,
        request: JobRequest {
            mode: Mode::Realtime,
            option: Some(1),
            block_count: 1,
        },
    });

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event in time")
        .expect("channel open");
    match event {
        EngineEvent::JobFinished { epoch, result } => {
            assert_eq!(epoch, 7);
            let batch = result.expect("batch");
            assert_eq!(batch.records.len(), 1);
            assert_eq!(batch.records[0].key(), Some("0x1"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn health_and_toggle_are_reported() {
    chainwatch_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "w3_connected": true,
            "ai_loaded": true,
            "model_enabled": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/model-toggle"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "message": "busy" })))
        .mount(&server)
        .await;

    let (engine, _events) = engine_for(&server);

    assert_eq!(
        engine.execute(EngineCommand::CheckHealth).await,
        EngineEvent::HealthChecked(HealthStatus {
            backend_reachable: true,
            model_enabled: true,
            model_loaded: true,
        })
    );

    match engine
        .execute(EngineCommand::ToggleModel { enabled: false })
        .await
    {
        EngineEvent::ModelToggled { enabled, result } => {
            assert!(!enabled);
            let err = result.unwrap_err();
            assert_eq!(err.kind, FailureKind::HttpStatus(503));
            assert_eq!(err.message, "busy");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn detail_failure_keeps_the_hash() {
    chainwatch_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/transaction/0xdead"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Transaction not found" })))
        .mount(&server)
        .await;

    let (engine, _events) = engine_for(&server);
    match engine
        .execute(EngineCommand::LoadDetail {
            hash: "0xdead".into(),
        })
        .await
    {
        EngineEvent::DetailLoaded { hash, result } => {
            assert_eq!(hash, "0xdead");
            assert_eq!(result.unwrap_err().message, "Transaction not found");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
