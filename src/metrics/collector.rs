// src/metrics/collector.rs
use crate::probe::ProbeStatus;
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap();
        buffer
    }
}

pub struct MetricsCollector {
    pub checks_total: IntCounterVec,
    pub check_duration_seconds: HistogramVec,
    pub probe_status: IntGaugeVec,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("sp_checks_total", "Total number of probe checks"),
            &["probe", "result"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let check_duration_seconds = HistogramVec::new(
            HistogramOpts::new("sp_check_duration_seconds", "Probe check duration in seconds"),
            &["probe"],
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        let probe_status = IntGaugeVec::new(
            Opts::new(
                "sp_probe_status",
                "Probe status (0=unknown, 1=checking, 2=success, 3=error)",
            ),
            &["probe"],
        )?;
        registry.register(Box::new(probe_status.clone()))?;

        Ok(Self {
            checks_total,
            check_duration_seconds,
            probe_status,
        })
    }

    pub fn record_check(&self, probe: &str, success: bool, duration: std::time::Duration) {
        let result = if success { "success" } else { "failure" };
        self.checks_total.with_label_values(&[probe, result]).inc();

        self.check_duration_seconds
            .with_label_values(&[probe])
            .observe(duration.as_secs_f64());
    }

    pub fn update_probe_status(&self, probe: &str, status: ProbeStatus) {
        self.probe_status
            .with_label_values(&[probe])
            .set(status.as_gauge());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn exposition_contains_recorded_checks() {
        let registry = MetricsRegistry::new().unwrap();
        let collector = registry.collector();

        collector.record_check("frontend", true, Duration::from_millis(12));
        collector.update_probe_status("frontend", ProbeStatus::Success);

        let text = String::from_utf8(registry.gather()).unwrap();
        assert!(text.contains("sp_checks_total"));
        assert!(text.contains("sp_probe_status"));
    }
}
