//! Per-token memoisation of API clients and services.
//!
//! Asking twice for the same resource type with the same access token and
//! scope set yields the same `Arc`. Entries live until [`ServiceRegistry::revoke`] drops them.

use crate::config::Config;
use crate::http_client::ReqwestStravaApi;
use crate::services::{
    ActivityService, AthleteService, ClubService, SegmentEffortService, SegmentService,
};
use crate::{StravaApi, Token};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;

/// Everything cached for one access token.
struct TokenEntry {
    api: Arc<dyn StravaApi>,
    token: Token,
    activities: OnceLock<Arc<ActivityService>>,
    athletes: OnceLock<Arc<AthleteService>>,
    clubs: OnceLock<Arc<ClubService>>,
    segments: OnceLock<Arc<SegmentService>>,
    segment_efforts: OnceLock<Arc<SegmentEffortService>>,
}

impl TokenEntry {
    fn new(api: Arc<dyn StravaApi>, token: Token) -> Self {
        Self {
            api,
            token,
            activities: OnceLock::new(),
            athletes: OnceLock::new(),
            clubs: OnceLock::new(),
            segments: OnceLock::new(),
            segment_efforts: OnceLock::new(),
        }
    }

    fn service<S>(
        &self,
        slot: &OnceLock<Arc<S>>,
        make: fn(Arc<dyn StravaApi>, Token) -> S,
    ) -> Arc<S> {
        slot.get_or_init(|| Arc::new(make(self.api.clone(), self.token.clone())))
            .clone()
    }
}

/// Token-keyed registry of Strava clients.
pub struct ServiceRegistry {
    base_url: String,
    client: reqwest::Client,
    entries: RwLock<HashMap<String, Arc<TokenEntry>>>,
}

impl ServiceRegistry {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client: reqwest::Client::new(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url)
    }

    async fn entry(&self, token: &Token) -> Arc<TokenEntry> {
        let key = token.cache_key();
        if let Some(entry) = self.entries.read().await.get(&key) {
            return entry.clone();
        }
        let mut entries = self.entries.write().await;
        entries
            .entry(key)
            .or_insert_with(|| {
                tracing::debug!("creating strava client for new token");
                let api = ReqwestStravaApi::with_client(
                    self.client.clone(),
                    &self.base_url,
                    token.access_token().clone(),
                );
                Arc::new(TokenEntry::new(Arc::new(api), token.clone()))
            })
            .clone()
    }

    /// The raw endpoint client for `token`.
    pub async fn api(&self, token: &Token) -> Arc<dyn StravaApi> {
        self.entry(token).await.api.clone()
    }

    pub async fn activities(&self, token: &Token) -> Arc<ActivityService> {
        let entry = self.entry(token).await;
        entry.service(&entry.activities, ActivityService::new)
    }

    pub async fn athletes(&self, token: &Token) -> Arc<AthleteService> {
        let entry = self.entry(token).await;
        entry.service(&entry.athletes, AthleteService::new)
    }

    pub async fn clubs(&self, token: &Token) -> Arc<ClubService> {
        let entry = self.entry(token).await;
        entry.service(&entry.clubs, ClubService::new)
    }

    pub async fn segments(&self, token: &Token) -> Arc<SegmentService> {
        let entry = self.entry(token).await;
        entry.service(&entry.segments, SegmentService::new)
    }

    pub async fn segment_efforts(&self, token: &Token) -> Arc<SegmentEffortService> {
        let entry = self.entry(token).await;
        entry.service(&entry.segment_efforts, SegmentEffortService::new)
    }

    /// Forget everything cached for `token`. Returns whether it was present.
    pub async fn revoke(&self, token: &Token) -> bool {
        let removed = self.entries.write().await.remove(&token.cache_key()).is_some();
        if removed {
            tracing::debug!("revoked cached strava clients for token");
        }
        removed
    }

    /// Number of tokens with cached clients.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
