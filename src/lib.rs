pub mod api;
pub mod config;
pub mod deeplink;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod utils;
pub mod validation;

use std::sync::Arc;

use crate::api::MobileApiClient;
use crate::config::Config;
use crate::services::{DashboardService, HttpPrefetcher, ImagePreloader};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, SessionStore};

/// Shared handles the services are built from.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: SessionStore,
    pub api: MobileApiClient,
    pub preloader: ImagePreloader,
}

impl AppState {
    /// Uses the configured session file when there is one, otherwise an
    /// in-memory store that lives as long as the process.
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn KeyValueStore> = match &config.session_file {
            Some(path) => Arc::new(FileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let session = SessionStore::new(store);
        let api = MobileApiClient::from_config(&config, session.clone());
        let preloader = ImagePreloader::with_concurrency(
            Arc::new(HttpPrefetcher::new()),
            config.image_concurrency,
        );
        Self {
            config,
            session,
            api,
            preloader,
        }
    }

    /// Dashboard service that primes promotion images through the shared
    /// preloader.
    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.api.clone()).with_preloader(self.preloader.clone())
    }
}
