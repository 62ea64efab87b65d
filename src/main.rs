// src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use status_probe::{
    config,
    metrics::MetricsRegistry,
    probe::ProbeSet,
    surface::{ServerBuilder, SurfaceHandler},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("status_probe=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    // Initialize metrics
    let metrics_registry = Arc::new(MetricsRegistry::new()?);
    let metrics = metrics_registry.collector();

    // Build the probe set from the configured targets
    let probes = Arc::new(ProbeSet::new(config.targets()?, Some(metrics)));
    info!("Tracking {} probe(s)", probes.len());

    // Every probe is checked once at startup; afterwards checks come in
    // through the surface trigger.
    {
        let probes = probes.clone();
        tokio::spawn(async move {
            probes.check_all().await;
        });
    }

    // Serve the surface
    let handler = SurfaceHandler::new(probes, metrics_registry);
    let addr = config.surface.listen;
    info!("Starting status surface on {}", addr);

    ServerBuilder::new(addr)
        .with_handler(handler)
        .serve_with_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
