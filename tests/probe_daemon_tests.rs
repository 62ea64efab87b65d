// tests/probe_daemon_tests.rs
use std::sync::Arc;

use hyper::{Body, Request, StatusCode};
use status_probe::config::Config;
use status_probe::metrics::MetricsRegistry;
use status_probe::probe::{ProbeSet, ProbeStatus};
use status_probe::surface::SurfaceHandler;
use tower::Service;
use url::Url;

fn config_for(server: &mockito::ServerGuard) -> Config {
    Config {
        base_url: Url::parse(&server.url()).unwrap(),
        ..Config::default()
    }
}

#[tokio::test]
async fn startup_sweep_reflects_endpoint_health() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/health")
        .with_status(500)
        .create_async()
        .await;

    let config = config_for(&server);
    let probes = Arc::new(ProbeSet::new(config.targets().unwrap(), None));
    probes.check_all().await;

    assert_eq!(
        probes.get("frontend").unwrap().status().await,
        ProbeStatus::Success
    );
    assert_eq!(
        probes.get("backend").unwrap().status().await,
        ProbeStatus::Error
    );
}

#[tokio::test]
async fn surface_reports_swept_statuses() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let config = config_for(&server);
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let probes = Arc::new(ProbeSet::new(
        config.targets().unwrap(),
        Some(metrics.collector()),
    ));
    let mut handler = SurfaceHandler::new(probes.clone(), metrics);

    // Before any check the surface reports unknown cells.
    let response = handler
        .call(Request::get("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["probes"][0]["status"], "unknown");
    assert_eq!(json["probes"][1]["status"], "unknown");

    probes.check_all().await;

    let response = handler
        .call(Request::get("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["probes"][0]["status"], "success");
    assert_eq!(json["probes"][1]["status"], "success");
    assert!(json["probes"][0]["last_checked"].is_string());
}

#[tokio::test]
async fn surface_trigger_rechecks_a_probe() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let config = config_for(&server);
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let probes = Arc::new(ProbeSet::new(
        config.targets().unwrap(),
        Some(metrics.collector()),
    ));
    let mut handler = SurfaceHandler::new(probes.clone(), metrics);

    let response = handler
        .call(
            Request::post("/api/probes/frontend/check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // The trigger returns before the check completes; wait for it to settle.
    let probe = probes.get("frontend").unwrap();
    let mut settled = false;
    for _ in 0..50 {
        if probe.status().await == ProbeStatus::Success {
            settled = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(settled, "triggered check never settled");

    let response = handler
        .call(
            Request::post("/api/probes/database/check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn read_json(response: hyper::Response<Body>) -> serde_json::Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
