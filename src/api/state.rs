//! Shared application state for the HTTP API (spec §6).

use std::sync::Arc;

use crate::cache::ScanCache;
use crate::config::ScannerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ScannerConfig>,
    pub cache: Arc<ScanCache>,
}

impl AppState {
    pub fn new(config: ScannerConfig) -> Self {
        AppState { config: Arc::new(config), cache: Arc::new(ScanCache::new()) }
    }

    pub fn details_url(&self, site_key: &str) -> String {
        format!("{}/analyze?host={}", self.config.base_url.trim_end_matches('/'), site_key)
    }
}
