use std::{collections::HashSet, sync::Arc};

use reanalyzer_model::{DocumentId, MediaRecord, RatingKey, ReconcileReport};
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::catalog::CatalogClient;
use crate::error::Result;

/// Makes the cache an exact copy of one remote section listing.
///
/// The remote listing is fetched before anything is written, so a failed
/// fetch leaves the cache untouched.
pub struct Reconciler {
    catalog: Arc<dyn CatalogClient>,
    store: Arc<dyn CacheStore>,
    section: String,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("section", &self.section)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn CacheStore>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            store,
            section: section.into(),
        }
    }

    pub fn default_section(&self) -> &str {
        &self.section
    }

    /// Full-replace reconciliation of `section` (or the configured one).
    pub async fn reconcile(
        &self,
        section: Option<&str>,
    ) -> Result<ReconcileReport> {
        let section = section.unwrap_or(&self.section);
        let remote = self.catalog.list_all(section).await?;
        let cached = self.store.list_all().await?;

        let remote_keys: HashSet<&RatingKey> =
            remote.iter().map(|item| &item.rating_key).collect();
        let stale: Vec<DocumentId> = cached
            .iter()
            .filter(|doc| !remote_keys.contains(doc.rating_key()))
            .map(|doc| doc.doc_id)
            .collect();

        let mut report = ReconcileReport::new(section);
        if !stale.is_empty() {
            debug!(section, stale = stale.len(), "removing stale cache documents");
            report.removed = self.store.delete_by_ids(&stale).await?;
        }

        let records: Vec<MediaRecord> =
            remote.into_iter().map(MediaRecord::from).collect();
        for outcome in self.store.upsert_many(records).await? {
            report.record(outcome.change);
        }

        info!(
            section,
            added = report.added,
            updated = report.updated,
            unchanged = report.unchanged,
            removed = report.removed,
            "synchronized cache with Plex"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::catalog::MockCatalogClient;
    use crate::error::{CatalogError, ReanalyzeError};
    use reanalyzer_model::{RecordField, RemoteItem};

    fn item(key: u64, title: &str) -> RemoteItem {
        let path = format!("/m/{key}.mkv");
        RemoteItem::from_part_path(key, title, Some(path.as_str()))
    }

    #[tokio::test]
    async fn failed_listing_leaves_cache_untouched() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_list_all().times(1).returning(|_| {
            Err(CatalogError::Status {
                status: 401,
                body: "Unauthorized".into(),
            })
        });
        let store = Arc::new(MemoryCacheStore::with_records([MediaRecord::new(
            1u64, "Kept", None,
        )]));

        let reconciler =
            Reconciler::new(Arc::new(catalog), store.clone(), "Movies");
        let err = reconciler.reconcile(None).await.unwrap_err();

        assert!(matches!(err, ReanalyzeError::Upstream(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn section_override_is_passed_to_the_catalog() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_list_all()
            .withf(|section| section.to_string() == "TV Shows")
            .times(1)
            .returning(|_| Ok(vec![item(5, "Show")]));
        let store = Arc::new(MemoryCacheStore::new());

        let reconciler =
            Reconciler::new(Arc::new(catalog), store.clone(), "Movies");
        let report = reconciler.reconcile(Some("TV Shows")).await.unwrap();

        assert_eq!(report.section, "TV Shows");
        assert_eq!(report.added, 1);
        let hits = store.search(RecordField::Title, "Show").await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn renamed_items_count_as_updates() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_list_all()
            .returning(|_| Ok(vec![item(1, "New Title"), item(2, "Same")]));
        let store = Arc::new(MemoryCacheStore::with_records([
            item(1, "Old Title").into_record(),
            item(2, "Same").into_record(),
        ]));

        let reconciler = Reconciler::new(Arc::new(catalog), store, "Movies");
        let report = reconciler.reconcile(None).await.unwrap();

        assert_eq!(
            (report.added, report.updated, report.unchanged, report.removed),
            (0, 1, 1, 0)
        );
    }
}
