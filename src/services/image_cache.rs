//! Promotion image pre-warming.
//!
//! Primes the image cache for promotion banners and logos so lists render
//! without placeholders. Best effort: a failed or abandoned fetch is logged
//! and the URL becomes eligible again on the next call. It never fails the
//! caller.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::domain::Promotion;

pub const DEFAULT_CONCURRENCY: usize = 4;

#[async_trait]
pub trait ImagePrefetcher: Send + Sync {
    async fn prefetch(&self, url: &str) -> anyhow::Result<()>;
}

/// Downloads the image and discards the body; the HTTP layer's cache keeps it.
pub struct HttpPrefetcher {
    client: Client,
}

impl HttpPrefetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpPrefetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImagePrefetcher for HttpPrefetcher {
    async fn prefetch(&self, url: &str) -> anyhow::Result<()> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.bytes().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadSummary {
    pub requested: usize,
    pub primed: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Default)]
struct PrimeState {
    primed: HashSet<String>,
    in_flight: HashSet<String>,
}

/// A URL being fetched. Dropping it, on completion or when the preload is
/// abandoned, frees the URL for the next call.
struct InFlight {
    state: Arc<Mutex<PrimeState>>,
    url: String,
}

impl InFlight {
    fn complete(&self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .primed
            .insert(self.url.clone());
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .in_flight
            .remove(&self.url);
    }
}

#[derive(Clone)]
pub struct ImagePreloader {
    prefetcher: Arc<dyn ImagePrefetcher>,
    state: Arc<Mutex<PrimeState>>,
    concurrency: usize,
}

impl ImagePreloader {
    pub fn new(prefetcher: Arc<dyn ImagePrefetcher>) -> Self {
        Self::with_concurrency(prefetcher, DEFAULT_CONCURRENCY)
    }

    pub fn with_concurrency(prefetcher: Arc<dyn ImagePrefetcher>, concurrency: usize) -> Self {
        Self {
            prefetcher,
            state: Arc::new(Mutex::new(PrimeState::default())),
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// None when the URL is already primed or another call is fetching it.
    fn claim(&self, url: &str) -> Option<InFlight> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.primed.contains(url) || !state.in_flight.insert(url.to_string()) {
            return None;
        }
        Some(InFlight {
            state: self.state.clone(),
            url: url.to_string(),
        })
    }

    pub fn primed_count(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).primed.len()
    }

    pub fn is_primed(&self, url: &str) -> bool {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .primed
            .contains(url)
    }

    pub fn clear(&self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .primed
            .clear();
    }

    pub async fn preload_promotion_images(&self, promotions: &[Promotion]) -> PreloadSummary {
        let mut summary = PreloadSummary::default();
        let mut to_fetch = Vec::new();

        for url in promotions.iter().flat_map(|p| p.image_urls()) {
            summary.requested += 1;
            match self.claim(url) {
                Some(claim) => to_fetch.push(claim),
                None => summary.skipped += 1,
            }
        }

        let results: Vec<bool> = stream::iter(to_fetch)
            .map(|claim| async move {
                match self.prefetcher.prefetch(&claim.url).await {
                    Ok(()) => {
                        claim.complete();
                        true
                    }
                    Err(e) => {
                        tracing::warn!(url = %claim.url, error = %e, "Image prefetch failed");
                        false
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        summary.primed = results.iter().filter(|ok| **ok).count();
        summary.failed = results.len() - summary.primed;
        tracing::debug!(
            requested = summary.requested,
            primed = summary.primed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Promotion images preloaded"
        );
        summary
    }

    /// Fire-and-forget variant for screen load.
    pub fn spawn_preload(&self, promotions: Vec<Promotion>) -> JoinHandle<PreloadSummary> {
        let preloader = self.clone();
        tokio::spawn(async move { preloader.preload_promotion_images(&promotions).await })
    }
}
