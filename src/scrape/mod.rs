//! Home page scraping
//!
//! Fetches a service's mobile home page and turns it into poster items. The
//! scraper never touches stored catalog state.

pub mod extract;

pub use extract::{AllPostersExtractor, PosterExtractor, Top10Extractor, extractor_for};

use crate::{
    Result,
    auth::CredentialCache,
    config::UpstreamSettings,
    types::{CatalogId, ScrapedPoster, Service},
    upstream::MirrorApi,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Scrapes catalogs from the mirror's home pages
#[derive(Debug)]
pub struct Scraper {
    upstream: Arc<dyn MirrorApi>,
    credentials: Arc<CredentialCache>,
    extractors: HashMap<CatalogId, Box<dyn PosterExtractor>>,
}

impl Scraper {
    /// Create a scraper with one extractor per catalog
    pub fn new(
        upstream: Arc<dyn MirrorApi>,
        credentials: Arc<CredentialCache>,
        settings: &UpstreamSettings,
    ) -> Self {
        let extractors = CatalogId::ALL
            .into_iter()
            .map(|id| {
                let cdn = match id.service() {
                    Service::Netflix => settings.netflix_poster_cdn.as_str(),
                    Service::AmazonPrime => settings.prime_poster_cdn.as_str(),
                };
                (id, extractor_for(id.kind(), cdn))
            })
            .collect();

        Self {
            upstream,
            credentials,
            extractors,
        }
    }

    /// Fetch and extract the posters of one catalog
    pub async fn scrape_catalog(&self, catalog: CatalogId) -> Result<Vec<ScrapedPoster>> {
        let cookie = match self.credentials.get_credential().await {
            Ok(credential) => Some(credential.value),
            Err(e) => {
                tracing::warn!("Scraping {} without a cookie: {}", catalog, e);
                None
            }
        };

        let html = self
            .upstream
            .fetch_home(catalog.service(), cookie.as_deref())
            .await?;

        let extractor = self
            .extractors
            .get(&catalog)
            .ok_or_else(|| crate::Error::internal(format!("no extractor for {catalog}")))?;
        let posters = extractor.extract(&html);

        tracing::info!(
            "Scraped {} poster(s) for {} from {} bytes of HTML",
            posters.len(),
            catalog,
            html.len()
        );
        Ok(posters)
    }
}
