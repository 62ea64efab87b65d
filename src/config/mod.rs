// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use url::Url;

/// Environment override for the base URL the probe paths resolve against.
pub const BASE_URL_ENV: &str = "STATUS_PROBE_BASE_URL";

/// Load configuration from a file (YAML or JSON). A missing file is not an
/// error: the built-in defaults describe the two fixed targets.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    let mut config: Config = match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            if path.extension().and_then(|s| s.to_str()) == Some("yaml")
                || path.extension().and_then(|s| s.to_str()) == Some("yml")
            {
                serde_yaml::from_str(&contents).context("Failed to parse YAML config")?
            } else {
                serde_json::from_str(&contents).context("Failed to parse JSON config")?
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No config file at {}, using defaults", path.display());
            Config::default()
        }
        Err(e) => return Err(e).context("Failed to read config file"),
    };

    if let Ok(base) = std::env::var(BASE_URL_ENV) {
        config.base_url = Url::parse(&base)
            .with_context(|| format!("invalid {} value: {:?}", BASE_URL_ENV, base))?;
    }

    config.validate()?;
    Ok(config)
}
