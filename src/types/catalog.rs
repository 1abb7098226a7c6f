//! Poster catalog data model
//!
//! A catalog is a named, persisted, ordered list of poster items. Three of
//! them exist: the Netflix "top 10" row, the full Netflix poster grid and the
//! full Prime poster grid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Streaming service fronted by the mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    /// Netflix mirror pages
    Netflix,
    /// Amazon Prime mirror pages
    AmazonPrime,
}

impl Service {
    /// Route/file-name slug of the service
    pub fn slug(&self) -> &'static str {
        match self {
            Service::Netflix => "netflix",
            Service::AmazonPrime => "amazon-prime",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Which extraction pattern a catalog is scraped with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// The ranked "top 10" row
    Top10,
    /// Every poster on the home page
    All,
}

/// Identifier of one persisted catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogId {
    /// Netflix top 10 row
    NetflixTop10,
    /// Full Netflix poster grid
    NetflixPosters,
    /// Full Prime poster grid
    AmazonPrimePosters,
}

impl CatalogId {
    /// Every catalog the bridge maintains
    pub const ALL: [CatalogId; 3] = [
        CatalogId::NetflixTop10,
        CatalogId::NetflixPosters,
        CatalogId::AmazonPrimePosters,
    ];

    /// Service whose home page is scraped for this catalog
    pub fn service(&self) -> Service {
        match self {
            CatalogId::NetflixTop10 | CatalogId::NetflixPosters => Service::Netflix,
            CatalogId::AmazonPrimePosters => Service::AmazonPrime,
        }
    }

    /// Extraction pattern used for this catalog
    pub fn kind(&self) -> CatalogKind {
        match self {
            CatalogId::NetflixTop10 => CatalogKind::Top10,
            CatalogId::NetflixPosters | CatalogId::AmazonPrimePosters => CatalogKind::All,
        }
    }

    /// File name inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            CatalogId::NetflixTop10 => "top10-cache.json",
            CatalogId::NetflixPosters => "all-posters-cache.json",
            CatalogId::AmazonPrimePosters => "amazon-prime-posters-cache.json",
        }
    }

    /// Stable name used for locking and logging
    pub fn name(&self) -> &'static str {
        match self {
            CatalogId::NetflixTop10 => "netflix-top10",
            CatalogId::NetflixPosters => "netflix-posters",
            CatalogId::AmazonPrimePosters => "amazon-prime-posters",
        }
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Poster as extracted from a page, before merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedPoster {
    /// Upstream numeric id
    pub id: String,
    /// Image URL
    pub poster: String,
}

impl ScrapedPoster {
    /// Create a scraped poster
    pub fn new(id: impl Into<String>, poster: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            poster: poster.into(),
        }
    }
}

/// Persisted poster with its seen flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterItem {
    /// Upstream numeric id, unique within a catalog
    pub id: String,
    /// Image URL
    pub poster: String,
    /// Whether the user already processed this title
    #[serde(default)]
    pub seen: bool,
}

impl PosterItem {
    /// Create a poster item
    pub fn new(id: impl Into<String>, poster: impl Into<String>, seen: bool) -> Self {
        Self {
            id: id.into(),
            poster: poster.into(),
            seen,
        }
    }
}

/// On-disk catalog file: `{items, lastUpdated}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Items in display order
    #[serde(default)]
    pub items: Vec<PosterItem>,
    /// Unix epoch milliseconds of the last write, 0 if never written
    #[serde(default)]
    pub last_updated: i64,
}

impl Catalog {
    /// Empty catalog with `lastUpdated = 0`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of unseen items
    pub fn unseen_count(&self) -> usize {
        self.items.iter().filter(|item| !item.seen).count()
    }
}

/// Result of a catalog refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// The catalog as persisted after the refresh
    pub catalog: Catalog,
    /// Items whose `seen` flag is false after the merge
    pub new_count: usize,
}
