//! Poster extraction strategies
//!
//! The mirror's home pages carry no structured data, so posters are pulled
//! out of the HTML with patterns. Each catalog kind has its own strategy.

use crate::types::{CatalogKind, ScrapedPoster};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static TOP10_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<div[^>]*class=["'][^"']*top10-post[^"']*["'][^>]*data-post=["'](\d+)["'].*?<img[^>]*data-src=["']([^"']+)["'][^>]*>"#,
    )
    .expect("Invalid top10 regex")
});

/// Turns a home page into an ordered list of posters
pub trait PosterExtractor: Send + Sync + std::fmt::Debug {
    /// Extract posters in document order; must not fail on unexpected markup
    fn extract(&self, html: &str) -> Vec<ScrapedPoster>;
}

/// Extracts the ranked "top 10" row
#[derive(Debug, Clone, Copy, Default)]
pub struct Top10Extractor;

impl PosterExtractor for Top10Extractor {
    fn extract(&self, html: &str) -> Vec<ScrapedPoster> {
        dedup_by_id(
            TOP10_PATTERN
                .captures_iter(html)
                .map(|captures| ScrapedPoster::new(&captures[1], &captures[2])),
        )
    }
}

/// Extracts every poster hosted under one CDN prefix
#[derive(Debug, Clone)]
pub struct AllPostersExtractor {
    anchored: Regex,
    bare: Regex,
}

impl AllPostersExtractor {
    /// Build the patterns for `cdn_prefix`, e.g. `https://imgcdn.kim/poster/v`
    pub fn new(cdn_prefix: &str) -> Self {
        let prefix = regex::escape(cdn_prefix.trim_end_matches('/'));
        let anchored = format!(
            r#"(?is)<a[^>]*data-post=["'](\d+)["'][^>]*>.*?<img[^>]*data-src=["']({prefix}/(\d+)\.jpg)["'][^>]*>"#
        );
        let bare = format!(r"{prefix}/(\d+)\.jpg");

        Self {
            anchored: Regex::new(&anchored).expect("Invalid anchored poster regex"),
            bare: Regex::new(&bare).expect("Invalid poster url regex"),
        }
    }
}

impl PosterExtractor for AllPostersExtractor {
    fn extract(&self, html: &str) -> Vec<ScrapedPoster> {
        let anchored = dedup_by_id(
            self.anchored
                .captures_iter(html)
                .map(|captures| ScrapedPoster::new(&captures[1], &captures[2])),
        );

        if !anchored.is_empty() {
            return anchored;
        }

        tracing::debug!("No anchored posters found, falling back to bare poster URLs");
        dedup_by_id(
            self.bare
                .captures_iter(html)
                .map(|captures| ScrapedPoster::new(&captures[1], &captures[0])),
        )
    }
}

/// Pick the extractor for a catalog kind
pub fn extractor_for(kind: CatalogKind, cdn_prefix: &str) -> Box<dyn PosterExtractor> {
    match kind {
        CatalogKind::Top10 => Box::new(Top10Extractor),
        CatalogKind::All => Box::new(AllPostersExtractor::new(cdn_prefix)),
    }
}

fn dedup_by_id(posters: impl Iterator<Item = ScrapedPoster>) -> Vec<ScrapedPoster> {
    let mut seen = HashSet::new();
    posters.filter(|poster| seen.insert(poster.id.clone())).collect()
}
