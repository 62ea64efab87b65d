// src/probe/set.rs
use crate::config::ProbeTarget;
use crate::metrics::MetricsCollector;
use crate::probe::status::ProbeStatus;
use crate::probe::tracker::{ProbeError, StatusProbe};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Point-in-time view of one probe, as handed to the rendering surface.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeSnapshot {
    pub label: String,
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

/// The configured probes, one tracker per `{label, url}` target, sharing a
/// single HTTP client.
pub struct ProbeSet {
    probes: DashMap<String, Arc<StatusProbe>>,
    order: Vec<String>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl ProbeSet {
    pub fn new(targets: Vec<ProbeTarget>, metrics: Option<Arc<MetricsCollector>>) -> Self {
        let client = Client::new();
        let probes = DashMap::new();
        let mut order = Vec::with_capacity(targets.len());

        for target in targets {
            let probe = Arc::new(StatusProbe::new(
                target.label.clone(),
                target.url,
                client.clone(),
            ));
            order.push(target.label.clone());
            probes.insert(target.label, probe);
        }

        Self {
            probes,
            order,
            metrics,
        }
    }

    pub fn get(&self, label: &str) -> Option<Arc<StatusProbe>> {
        self.probes.get(label).map(|p| p.clone())
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Check every probe once, one independent task per probe.
    pub async fn check_all(&self) {
        let mut tasks = Vec::with_capacity(self.order.len());

        for label in &self.order {
            let Some(probe) = self.get(label) else {
                continue;
            };
            tasks.push(tokio::spawn(Self::run_check(probe, self.metrics.clone())));
        }

        let results = join_all(tasks).await;

        let mut ok = 0;
        let mut failed = 0;
        for result in results {
            match result {
                Ok(Ok(_)) => ok += 1,
                Ok(Err(_)) => failed += 1,
                Err(e) => {
                    error!("check task join error: {}", e);
                    failed += 1;
                }
            }
        }

        info!("status sweep complete: {} ok, {} failed", ok, failed);
    }

    /// Re-check one probe without waiting for it: the retry callback handed
    /// to the surface. Returns false for an unknown label.
    pub fn trigger(&self, label: &str) -> bool {
        let Some(probe) = self.get(label) else {
            return false;
        };

        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            // The failure is already reflected in the cell and logged.
            let _ = Self::run_check(probe, metrics).await;
        });

        true
    }

    pub async fn snapshots(&self) -> Vec<ProbeSnapshot> {
        let mut out = Vec::with_capacity(self.order.len());

        for label in &self.order {
            let Some(probe) = self.get(label) else {
                continue;
            };
            out.push(ProbeSnapshot {
                label: probe.label.clone(),
                status: probe.status().await,
                last_checked: probe.last_checked().await,
            });
        }

        out
    }

    async fn run_check(
        probe: Arc<StatusProbe>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Result<Value, ProbeError> {
        if let Some(metrics) = &metrics {
            metrics.update_probe_status(&probe.label, ProbeStatus::Checking);
        }

        let start = Instant::now();
        let result = probe.check().await;

        if let Some(metrics) = &metrics {
            metrics.record_check(&probe.label, result.is_ok(), start.elapsed());
            metrics.update_probe_status(&probe.label, probe.status().await);
        }

        result
    }
}
