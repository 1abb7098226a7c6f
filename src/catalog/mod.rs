//! Poster catalogs
//!
//! Ties the scraper to the file store: `read` serves what is on disk,
//! `refresh` scrapes and merges, `mark` flags items as seen.

pub mod store;

pub use store::{CatalogStore, apply_marks, merge_carry_forward};

use crate::{
    Result,
    scrape::Scraper,
    types::{Catalog, CatalogId, RefreshOutcome},
};
use std::sync::Arc;

/// Catalog operations exposed to the HTTP layer
#[derive(Debug)]
pub struct CatalogService {
    scraper: Arc<Scraper>,
    store: Arc<CatalogStore>,
}

impl CatalogService {
    /// Create the service
    pub fn new(scraper: Arc<Scraper>, store: Arc<CatalogStore>) -> Self {
        Self { scraper, store }
    }

    /// Stored catalog; never touches the network
    pub async fn read(&self, catalog: CatalogId) -> Result<Catalog> {
        self.store.read(catalog).await
    }

    /// Scrape the catalog and merge the result into storage
    ///
    /// Scraping happens outside the catalog lock; a failed scrape leaves the
    /// stored file untouched.
    pub async fn refresh(&self, catalog: CatalogId) -> Result<RefreshOutcome> {
        let scraped = self.scraper.scrape_catalog(catalog).await?;
        let outcome = self.store.apply_refresh(catalog, scraped).await?;

        tracing::info!(
            "Refreshed {}: {} item(s), {} new",
            catalog,
            outcome.catalog.items.len(),
            outcome.new_count
        );
        Ok(outcome)
    }

    /// Flag items as seen
    pub async fn mark(&self, catalog: CatalogId, ids: &[String]) -> Result<Catalog> {
        self.store.mark(catalog, ids).await
    }
}
