// src/config/models.rs
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::net::SocketAddr;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL probe paths are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    #[serde(default)]
    pub surface: SurfaceConfig,

    #[serde(default = "default_probes")]
    pub probes: Vec<ProbeConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            surface: SurfaceConfig::default(),
            probes: default_probes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceConfig {
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

/// One resolved probe target: label plus the absolute URL to check.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub label: String,
    pub url: Url,
}

fn default_base_url() -> Url {
    Url::parse("http://127.0.0.1:3000/").expect("default base URL is valid")
}

fn default_listen_addr() -> SocketAddr {
    ([0, 0, 0, 0], 8989).into()
}

fn default_probes() -> Vec<ProbeConfig> {
    vec![
        ProbeConfig {
            label: "frontend".to_string(),
            path: "/health".to_string(),
        },
        ProbeConfig {
            label: "backend".to_string(),
            path: "/api/health".to_string(),
        },
    ]
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.probes.is_empty() {
            bail!("at least one probe must be configured");
        }

        let mut seen = HashSet::new();
        for probe in &self.probes {
            if probe.label.trim().is_empty() {
                bail!("probe labels must be non-empty");
            }
            if !seen.insert(probe.label.as_str()) {
                bail!("duplicate probe label: {}", probe.label);
            }
            self.base_url
                .join(&probe.path)
                .with_context(|| format!("invalid path for probe {}: {:?}", probe.label, probe.path))?;
        }

        Ok(())
    }

    /// Resolve every configured probe against the base URL.
    pub fn targets(&self) -> Result<Vec<ProbeTarget>> {
        self.probes
            .iter()
            .map(|probe| {
                let url = self
                    .base_url
                    .join(&probe.path)
                    .with_context(|| format!("invalid path for probe {}: {:?}", probe.label, probe.path))?;
                Ok(ProbeTarget {
                    label: probe.label.clone(),
                    url,
                })
            })
            .collect()
    }
}
