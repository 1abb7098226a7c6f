//! Title metadata lookups
//!
//! Fetches a title document from the mirror and reshapes it into the small,
//! stable shape the frontend renders.

pub mod fields;
pub mod netflix;
pub mod prime;

pub use netflix::{NetflixDetails, Season};
pub use prime::PrimeDetails;

use crate::{Result, auth::CredentialCache, types::Service, upstream::MirrorApi};
use serde_json::Value;
use std::sync::Arc;

/// Metadata lookups for both services
#[derive(Debug)]
pub struct MetadataService {
    upstream: Arc<dyn MirrorApi>,
    credentials: Arc<CredentialCache>,
}

impl MetadataService {
    /// Create the service
    pub fn new(upstream: Arc<dyn MirrorApi>, credentials: Arc<CredentialCache>) -> Self {
        Self {
            upstream,
            credentials,
        }
    }

    /// Look up a Netflix title
    pub async fn netflix(&self, id: &str) -> Result<NetflixDetails> {
        let cookie = self.cookie().await;
        let doc = self.fetch_document(Service::Netflix, id, cookie.as_deref()).await?;

        if doc.get("status").and_then(Value::as_str) != Some("y") {
            return Err(crate::Error::not_found("Content not found on Netflix"));
        }
        if fields::present(&doc, "title").is_none() {
            return Err(crate::Error::not_found("No title data available"));
        }

        let seasons = match netflix::season_entries(&doc) {
            Some(entries) => {
                let mut seasons = Vec::with_capacity(entries.len());
                for (index, entry) in entries.iter().enumerate() {
                    seasons.push(self.resolve_season(id, entry, index, cookie.as_deref()).await);
                }
                Some(seasons)
            }
            None => None,
        };

        Ok(NetflixDetails::from_document(&doc, seasons))
    }

    /// Look up an Amazon Prime title
    pub async fn amazon_prime(&self, id: &str) -> Result<PrimeDetails> {
        let cookie = self.cookie().await;
        let doc = self
            .fetch_document(Service::AmazonPrime, id, cookie.as_deref())
            .await?;
        Ok(PrimeDetails::from_document(&doc))
    }

    async fn cookie(&self) -> Option<String> {
        match self.credentials.get_credential().await {
            Ok(credential) => Some(credential.value),
            Err(e) => {
                tracing::warn!("Looking up metadata without a cookie: {}", e);
                None
            }
        }
    }

    async fn fetch_document(&self, service: Service, id: &str, cookie: Option<&str>) -> Result<Value> {
        let body = self.upstream.fetch_title(service, id, cookie).await?;
        let context = format!("{service} metadata");

        if body.trim().is_empty() {
            return Err(crate::Error::invalid_json(context, "empty response body".to_string()));
        }

        serde_json::from_str(&body).map_err(|e| crate::Error::invalid_json(context, e.to_string()))
    }

    async fn resolve_season(
        &self,
        series_id: &str,
        entry: &Value,
        index: usize,
        cookie: Option<&str>,
    ) -> Season {
        let (season_id, number) = netflix::season_identity(entry, index);
        let mut episode_count = netflix::stated_episode_count(entry);

        if episode_count == 0 {
            match self.upstream.fetch_episodes(series_id, &season_id, cookie).await {
                Ok(body) => {
                    episode_count = netflix::count_listed_episodes(&body).unwrap_or(0);
                }
                Err(e) => {
                    tracing::debug!("Episode listing for season {} failed: {}", season_id, e);
                }
            }
        }

        tracing::debug!("Season {}: episodeCount={}", number, episode_count);
        Season {
            id: season_id,
            number,
            episode_count,
        }
    }
}
