//! Scanner configuration (spec §6 "Environment and configuration").
//!
//! Read from an optional TOML file at start-up (`--config` / env
//! `HTTPOBS_CONFIG`), falling back to the defaults below. `HTTPOBS_BASE_URL`
//! always overrides `base_url` regardless of the file, matching the spec's
//! call-out of that one variable specifically.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ScanError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub base_url: String,
    pub cooldown_secs: u64,
    pub get_cache_age_secs: u64,
    pub max_redirects: u32,
    pub max_body_bytes: usize,
    pub probe_timeout_secs: u64,
    pub max_batch_size: usize,
    pub batch_concurrency: usize,
    pub allow_private_hosts: bool,
    pub bind_addr: String,
    /// Hard wall-clock cap on an entire scan, independent of per-probe timeouts.
    pub scan_timeout_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            base_url: "http://localhost:8080".to_string(),
            cooldown_secs: 60,
            get_cache_age_secs: 24 * 60 * 60,
            max_redirects: 20,
            max_body_bytes: 256 * 1024,
            probe_timeout_secs: 10,
            max_batch_size: 10,
            batch_concurrency: 5,
            allow_private_hosts: false,
            bind_addr: "0.0.0.0:8080".to_string(),
            scan_timeout_secs: 45,
        }
    }
}

impl ScannerConfig {
    pub fn load(path: Option<&str>) -> Result<Self, ScanError> {
        let mut config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)?;
                toml::from_str(&text).map_err(|e| ScanError::ScanFailed(e.to_string()))?
            }
            None => ScannerConfig::default(),
        };

        if let Ok(base_url) = std::env::var("HTTPOBS_BASE_URL") {
            config.base_url = base_url;
        }

        Ok(config)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn get_cache_age(&self) -> Duration {
        Duration::from_secs(self.get_cache_age_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }
}
