// src/surface/handler.rs
use crate::metrics::MetricsRegistry;
use crate::probe::{ProbeSet, ProbeSnapshot};
use hyper::{header, Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tower::Service;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the external renderer works with per probe: the current status, the
/// label, and a re-check trigger. Statuses are read from `/api/status`;
/// `POST /api/probes/{label}/check` is the retry callback.
#[derive(Clone)]
pub struct SurfaceHandler {
    probes: Arc<ProbeSet>,
    metrics: Arc<MetricsRegistry>,
}

#[derive(Serialize)]
struct StatusResponse {
    version: String,
    probes: Vec<ProbeSnapshot>,
}

impl SurfaceHandler {
    pub fn new(probes: Arc<ProbeSet>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { probes, metrics }
    }

    async fn route(
        probes: Arc<ProbeSet>,
        metrics: Arc<MetricsRegistry>,
        req: Request<Body>,
    ) -> Response<Body> {
        match (req.method(), req.uri().path()) {
            (&Method::GET, "/api/status") => {
                let body = StatusResponse {
                    version: VERSION.to_string(),
                    probes: probes.snapshots().await,
                };
                json_response(StatusCode::OK, serde_json::to_vec(&body).unwrap())
            }
            (&Method::POST, path) if trigger_label(path).is_some() => {
                let label = trigger_label(path).unwrap();
                if probes.trigger(label) {
                    json_response(
                        StatusCode::ACCEPTED,
                        serde_json::to_vec(&serde_json::json!({
                            "label": label,
                            "triggered": true,
                        }))
                        .unwrap(),
                    )
                } else {
                    json_response(
                        StatusCode::NOT_FOUND,
                        serde_json::to_vec(&serde_json::json!({
                            "error": format!("unknown probe label: {label}"),
                        }))
                        .unwrap(),
                    )
                }
            }
            (&Method::GET, "/metrics") => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
                .body(Body::from(metrics.gather()))
                .unwrap(),
            _ => Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::from("Not Found"))
                .unwrap(),
        }
    }
}

fn trigger_label(path: &str) -> Option<&str> {
    path.strip_prefix("/api/probes/")?
        .strip_suffix("/check")
        .filter(|label| !label.is_empty() && !label.contains('/'))
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

impl Service<Request<Body>> for SurfaceHandler {
    type Response = Response<Body>;
    type Error = std::convert::Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let probes = self.probes.clone();
        let metrics = self.metrics.clone();
        Box::pin(async move { Ok(Self::route(probes, metrics, req).await) })
    }
}
