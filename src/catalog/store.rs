//! File-backed catalog storage
//!
//! One pretty-printed JSON file per catalog inside the data directory.
//! Read-modify-write cycles are serialized per catalog and every write goes
//! through a temporary file that is renamed over the target.

use crate::{
    Result,
    auth::Clock,
    types::{Catalog, CatalogId, PosterItem, RefreshOutcome, ScrapedPoster},
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// Persisted catalogs with per-catalog locking
#[derive(Debug)]
pub struct CatalogStore {
    data_dir: PathBuf,
    clock: Arc<dyn Clock>,
    locks: HashMap<CatalogId, Mutex<()>>,
}

impl CatalogStore {
    /// Create a store rooted at `data_dir`; the directory is created on first write
    pub fn new(data_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            data_dir: data_dir.into(),
            clock,
            locks: CatalogId::ALL
                .into_iter()
                .map(|id| (id, Mutex::new(())))
                .collect(),
        }
    }

    /// Path of a catalog's file
    pub fn path_of(&self, catalog: CatalogId) -> PathBuf {
        self.data_dir.join(catalog.file_name())
    }

    /// Load a catalog; a missing or malformed file reads as empty
    pub async fn read(&self, catalog: CatalogId) -> Result<Catalog> {
        let path = self.path_of(catalog);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Catalog file does not exist: {:?}", path);
                return Ok(Catalog::empty());
            }
            Err(e) => {
                error!("Failed to read catalog file {:?}: {}", path, e);
                return Err(storage_error("read", &path, &e));
            }
        };

        match serde_json::from_str(&content) {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                warn!("Error parsing catalog {:?}, treating as empty: {}", path, e);
                Ok(Catalog::empty())
            }
        }
    }

    /// Merge freshly scraped posters into the stored catalog and persist it
    pub async fn apply_refresh(
        &self,
        catalog: CatalogId,
        scraped: Vec<ScrapedPoster>,
    ) -> Result<RefreshOutcome> {
        let _guard = self.lock(catalog).await?;

        let previous = self.read(catalog).await?;
        let updated = Catalog {
            items: merge_carry_forward(&previous.items, scraped),
            last_updated: self.clock.now().timestamp_millis(),
        };
        self.write(catalog, &updated).await?;

        let new_count = updated.unseen_count();
        Ok(RefreshOutcome {
            catalog: updated,
            new_count,
        })
    }

    /// Flag `ids` as seen and persist; unknown ids are ignored
    pub async fn mark(&self, catalog: CatalogId, ids: &[String]) -> Result<Catalog> {
        let _guard = self.lock(catalog).await?;

        let mut current = self.read(catalog).await?;
        let changed = apply_marks(&mut current.items, ids);
        current.last_updated = self.clock.now().timestamp_millis();
        self.write(catalog, &current).await?;

        debug!("Marked {} item(s) of {} as seen", changed, catalog);
        Ok(current)
    }

    async fn lock(&self, catalog: CatalogId) -> Result<tokio::sync::MutexGuard<'_, ()>> {
        let lock = self
            .locks
            .get(&catalog)
            .ok_or_else(|| crate::Error::internal(format!("no lock for {catalog}")))?;
        Ok(lock.lock().await)
    }

    async fn write(&self, catalog: CatalogId, contents: &Catalog) -> Result<()> {
        let path = self.path_of(catalog);
        let json = serde_json::to_string_pretty(contents)?;

        if let Err(e) = fs::create_dir_all(&self.data_dir).await {
            error!("Failed to create data directory {:?}: {}", self.data_dir, e);
            return Err(storage_error("create_dir", &self.data_dir, &e));
        }

        let tmp = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp, json).await {
            error!("Failed to write catalog file {:?}: {}", tmp, e);
            return Err(storage_error("write", &tmp, &e));
        }

        if let Err(e) = fs::rename(&tmp, &path).await {
            error!("Failed to replace catalog file {:?}: {}", path, e);
            let _ = fs::remove_file(&tmp).await;
            return Err(storage_error("rename", &path, &e));
        }

        debug!("Catalog {} saved to {:?}", catalog, path);
        Ok(())
    }
}

fn storage_error(operation: &str, path: &Path, e: &std::io::Error) -> crate::Error {
    crate::Error::storage(
        operation.to_string(),
        path.display().to_string(),
        e.to_string(),
    )
}

/// Project scraped posters onto the previous items
///
/// The result follows the scrape's order and contents. Ids already present
/// keep their `seen` flag, new ids start unseen, ids no longer scraped are
/// dropped.
pub fn merge_carry_forward(previous: &[PosterItem], scraped: Vec<ScrapedPoster>) -> Vec<PosterItem> {
    let seen_before: HashMap<&str, bool> = previous
        .iter()
        .map(|item| (item.id.as_str(), item.seen))
        .collect();

    scraped
        .into_iter()
        .map(|poster| {
            let seen = seen_before.get(poster.id.as_str()).copied().unwrap_or(false);
            PosterItem::new(poster.id, poster.poster, seen)
        })
        .collect()
}

/// Set `seen` on every item whose id is listed; returns how many matched
pub fn apply_marks(items: &mut [PosterItem], ids: &[String]) -> usize {
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut matched = 0;
    for item in items.iter_mut().filter(|item| wanted.contains(item.id.as_str())) {
        item.seen = true;
        matched += 1;
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ManualClock;
    use chrono::{DateTime, Duration};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> (CatalogStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        (CatalogStore::new(dir.path(), clock.clone()), clock)
    }

    #[test]
    fn test_merge_carry_forward() {
        let previous = vec![PosterItem::new("1", "p1", true), PosterItem::new("2", "p2", false)];
        let scraped = vec![ScrapedPoster::new("2", "p2"), ScrapedPoster::new("3", "p3")];

        assert_eq!(
            merge_carry_forward(&previous, scraped),
            vec![PosterItem::new("2", "p2", false), PosterItem::new("3", "p3", false)]
        );
    }

    #[test]
    fn test_merge_keeps_seen_for_existing_ids() {
        let previous = vec![PosterItem::new("7", "old.jpg", true)];
        let merged = merge_carry_forward(&previous, vec![ScrapedPoster::new("7", "new.jpg")]);
        assert_eq!(merged, vec![PosterItem::new("7", "new.jpg", true)]);
    }

    #[test]
    fn test_apply_marks_ignores_unknown() {
        let mut items = vec![PosterItem::new("1", "p1", false), PosterItem::new("2", "p2", false)];
        let changed = apply_marks(&mut items, &["1".to_string(), "9".to_string()]);

        assert_eq!(changed, 1);
        assert_eq!(
            items,
            vec![PosterItem::new("1", "p1", true), PosterItem::new("2", "p2", false)]
        );
    }

    #[tokio::test]
    async fn test_read_without_file() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_in(&dir);

        let catalog = store.read(CatalogId::NetflixTop10).await.unwrap();
        assert!(catalog.items.is_empty());
        assert_eq!(catalog.last_updated, 0);
    }

    #[tokio::test]
    async fn test_read_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_in(&dir);
        std::fs::write(store.path_of(CatalogId::NetflixPosters), "{not json").unwrap();

        let catalog = store.read(CatalogId::NetflixPosters).await.unwrap();
        assert_eq!(catalog, Catalog::empty());
    }

    #[tokio::test]
    async fn test_refresh_persists_and_counts_unseen() {
        let dir = TempDir::new().unwrap();
        let (store, clock) = store_in(&dir);
        let id = CatalogId::AmazonPrimePosters;

        let first = store
            .apply_refresh(id, vec![ScrapedPoster::new("1", "p1"), ScrapedPoster::new("2", "p2")])
            .await
            .unwrap();
        assert_eq!(first.new_count, 2);
        assert_eq!(first.catalog.last_updated, clock.now().timestamp_millis());

        store.mark(id, &["1".to_string()]).await.unwrap();
        clock.advance(Duration::minutes(5));

        let second = store
            .apply_refresh(id, vec![ScrapedPoster::new("2", "p2"), ScrapedPoster::new("3", "p3")])
            .await
            .unwrap();
        assert_eq!(second.new_count, 2);
        assert_eq!(
            second.catalog.items,
            vec![PosterItem::new("2", "p2", false), PosterItem::new("3", "p3", false)]
        );

        let on_disk = store.read(id).await.unwrap();
        assert_eq!(on_disk, second.catalog);
        assert!(!store.path_of(id).with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_mark_updates_timestamp() {
        let dir = TempDir::new().unwrap();
        let (store, clock) = store_in(&dir);
        let id = CatalogId::NetflixTop10;

        store
            .apply_refresh(id, vec![ScrapedPoster::new("1", "p1")])
            .await
            .unwrap();
        clock.advance(Duration::seconds(30));

        let marked = store.mark(id, &["1".to_string()]).await.unwrap();
        assert!(marked.items[0].seen);
        assert_eq!(marked.last_updated, clock.now().timestamp_millis());
    }

    #[tokio::test]
    async fn test_concurrent_marks_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_in(&dir);
        let store = Arc::new(store);
        let id = CatalogId::NetflixPosters;

        let scraped = (0..20).map(|i| ScrapedPoster::new(i.to_string(), format!("p{i}")));
        store.apply_refresh(id, scraped.collect()).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.mark(id, &[i.to_string()]).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let catalog = store.read(id).await.unwrap();
        assert_eq!(catalog.unseen_count(), 0);
    }
}
