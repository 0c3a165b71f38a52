//! Real-strategy dispatch tests
//!
//! Exercise the remote acquisition path against an in-process stub of the
//! remote dashboard service, listening on an ephemeral port: wire contract
//! (path, correlation header, payload passthrough), failure detail on
//! non-2xx, and full orchestration in real mode including the cache.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use riskwiz_common::config::{AcquisitionMode, ServiceConfig};
use riskwiz_common::types::{PrecisionLevel, WizardInputs};
use riskwiz_common::versions::DatasetVersionRegistry;
use riskwiz_do::cache::ResultCache;
use riskwiz_do::dispatch::{AcquisitionStrategy, DispatchError, RemoteClient};
use riskwiz_do::orchestrator::Orchestrator;

/// What the stub observed about incoming dispatches
#[derive(Clone, Default)]
struct StubState {
    request_ids: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<u32>>,
}

/// A contractually valid dashboard payload echoing the request's location
fn canned_payload(inputs: &Value) -> Value {
    let key = inputs["location_key"].as_str().unwrap_or("unknown");
    json!({
        "location": {
            "key": key,
            "name": "Stubbed Place",
            "region_profile": "stub region profile"
        },
        "baseline": {
            "value": 1.7,
            "unit": "°C",
            "confidence": "high"
        },
        "risk_chain": {
            "nodes": [
                {
                    "id": "hz-heat",
                    "label": "Heat",
                    "kind": "hazard",
                    "severity": 0.55,
                    "drift": { "direction": "rising", "magnitude": "major" }
                }
            ],
            "spillover": {
                "score": 0.2,
                "summary": "stub spillover summary"
            }
        },
        "metadata": {
            "as_of": "2025-07-28T12:00:00Z",
            "dataset_versions": [
                { "source": "baseline_model", "version": "remote-1.0" }
            ],
            "provenance": "stub remote service"
        }
    })
}

async fn stub_dashboard(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(inputs): Json<Value>,
) -> Json<Value> {
    let request_id = headers
        .get("X-Request-ID")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.request_ids.lock().unwrap().push(request_id);
    *state.calls.lock().unwrap() += 1;
    Json(canned_payload(&inputs))
}

async fn stub_unavailable() -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "UPSTREAM_DOWN", "message": "scheduled maintenance" })),
    )
}

/// Spawn a stub server on an ephemeral port and return its address
async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn wizard_inputs() -> WizardInputs {
    WizardInputs {
        location_key: "geo_7".into(),
        selected_hazards: vec!["Heat".into()],
        selected_system: "Health".into(),
        precision_level: PrecisionLevel::Exact,
    }
}

#[tokio::test]
async fn remote_dispatch_carries_the_fingerprint_header() {
    let stub = StubState::default();
    let router = Router::new()
        .route("/wizard/dashboard", post(stub_dashboard))
        .with_state(stub.clone());
    let addr = spawn_stub(router).await;

    let client = RemoteClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let payload = client
        .fetch_dashboard(&wizard_inputs(), "fp-correlation-1")
        .await
        .unwrap();

    assert_eq!(payload["location"]["key"], "geo_7");
    assert_eq!(
        stub.request_ids.lock().unwrap().as_slice(),
        ["fp-correlation-1"]
    );
}

#[tokio::test]
async fn non_success_status_surfaces_with_diagnostic_body() {
    let router = Router::new().route("/wizard/dashboard", post(stub_unavailable));
    let addr = spawn_stub(router).await;

    let client = RemoteClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = client
        .fetch_dashboard(&wizard_inputs(), "fp-correlation-2")
        .await
        .unwrap_err();

    match err {
        DispatchError::Remote { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("scheduled maintenance"));
        }
        other => panic!("expected remote error, got {other}"),
    }
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    // Nothing listens here; connection is refused immediately
    let client = RemoteClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = client
        .fetch_dashboard(&wizard_inputs(), "fp-correlation-3")
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Network(_)));
}

#[tokio::test]
async fn real_mode_orchestration_validates_and_caches_remote_results() {
    let stub = StubState::default();
    let router = Router::new()
        .route("/wizard/dashboard", post(stub_dashboard))
        .with_state(stub.clone());
    let addr = spawn_stub(router).await;

    let config = ServiceConfig {
        mode: AcquisitionMode::Real,
        remote_base: format!("http://{addr}"),
        ..ServiceConfig::default()
    };
    let registry = DatasetVersionRegistry::default();
    let strategy = AcquisitionStrategy::from_config(&config, &registry).unwrap();
    let orchestrator = Orchestrator::new(registry, ResultCache::new(), strategy);

    let first = orchestrator.run(&wizard_inputs()).await.unwrap();
    assert_eq!(first.location.key, "geo_7");
    assert_eq!(first.metadata.provenance, "stub remote service");

    // Second identical call is served from the cache; the stub sees only
    // one dispatch, correlated by the same fingerprint
    let second = orchestrator.run(&wizard_inputs()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(*stub.calls.lock().unwrap(), 1);

    let ids = stub.request_ids.lock().unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0], orchestrator.fingerprint_for(&wizard_inputs()));
}
