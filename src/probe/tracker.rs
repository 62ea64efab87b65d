// src/probe/tracker.rs
use crate::probe::status::ProbeStatus;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Why a check settled on `error`. Both variants collapse to the same
/// observable state; the distinction is only logged.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Http { status: reqwest::StatusCode },
}

/// One named endpoint and its status cell.
///
/// The cell is written only by this probe's own check path. A concurrent
/// re-invocation restarts from `Checking`; an in-flight check always runs to
/// completion, so a stale completion may overwrite a newer state.
pub struct StatusProbe {
    pub label: String,
    pub url: Url,
    client: Client,
    status: RwLock<ProbeStatus>,
    last_checked: RwLock<Option<DateTime<Utc>>>,
}

impl StatusProbe {
    pub fn new(label: impl Into<String>, url: Url, client: Client) -> Self {
        Self {
            label: label.into(),
            url,
            client,
            status: RwLock::new(ProbeStatus::Unknown),
            last_checked: RwLock::new(None),
        }
    }

    pub async fn status(&self) -> ProbeStatus {
        *self.status.read().await
    }

    /// Completion time of the most recent check, success or not.
    pub async fn last_checked(&self) -> Option<DateTime<Utc>> {
        *self.last_checked.read().await
    }

    /// Perform one check: flip the cell to `Checking`, GET the endpoint,
    /// settle the cell, and return the parsed body or the failure.
    pub async fn check(&self) -> Result<Value, ProbeError> {
        let check_id = Uuid::new_v4();
        self.transition(ProbeStatus::Checking).await;
        debug!(probe = %self.label, %check_id, url = %self.url, "check started");

        let result = self.request().await;

        {
            let mut last_checked = self.last_checked.write().await;
            *last_checked = Some(Utc::now());
        }
        self.transition(ProbeStatus::completed(result.is_ok())).await;

        match &result {
            Ok(_) => debug!(probe = %self.label, %check_id, "check succeeded"),
            Err(e) => warn!(probe = %self.label, %check_id, error = %e, "check failed"),
        }

        result
    }

    async fn request(&self) -> Result<Value, ProbeError> {
        let response = self.client.get(self.url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Http { status });
        }

        // A JSON body comes back parsed; anything else as a JSON string.
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    async fn transition(&self, next: ProbeStatus) {
        let mut status = self.status.write().await;
        *status = next;
    }
}
