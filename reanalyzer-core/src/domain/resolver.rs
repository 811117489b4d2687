use std::sync::Arc;

use reanalyzer_model::{LookupRequest, MediaQuery, MediaRecord, MissPolicy};
use tracing::{debug, info};

use super::reconciler::Reconciler;
use crate::cache::CacheStore;
use crate::catalog::CatalogClient;
use crate::error::Result;

/// Translates a title or filename into cached records, refreshing the cache
/// from Plex once when the first lookup misses.
pub struct Resolver {
    catalog: Arc<dyn CatalogClient>,
    store: Arc<dyn CacheStore>,
    reconciler: Reconciler,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("section", &self.default_section())
            .finish_non_exhaustive()
    }
}

impl Resolver {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn CacheStore>,
        section: impl Into<String>,
    ) -> Self {
        let reconciler =
            Reconciler::new(Arc::clone(&catalog), Arc::clone(&store), section);
        Self {
            catalog,
            store,
            reconciler,
        }
    }

    pub fn default_section(&self) -> &str {
        self.reconciler.default_section()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Lookup with a targeted remote search on miss.
    pub async fn resolve(
        &self,
        request: &LookupRequest,
    ) -> Result<Vec<MediaRecord>> {
        self.resolve_with(MissPolicy::Targeted, request).await
    }

    /// Lookup with a full section reconcile on miss.
    pub async fn sync_and_resolve(
        &self,
        request: &LookupRequest,
    ) -> Result<Vec<MediaRecord>> {
        self.resolve_with(MissPolicy::FullSync, request).await
    }

    /// Validates `request` and resolves it under `policy`. An invalid request
    /// fails before the store or the catalog is touched.
    pub async fn resolve_with(
        &self,
        policy: MissPolicy,
        request: &LookupRequest,
    ) -> Result<Vec<MediaRecord>> {
        let query = request.query()?;
        let section = request.section().unwrap_or(self.default_section());
        self.lookup(policy, section, &query).await
    }

    /// Searches the cache, refreshing it from `section` once on a miss.
    ///
    /// Cached records do not carry their section, so a hit is returned
    /// whichever section it was loaded from; `section` only selects where
    /// the refresh looks. A full sync replaces the cache with one section's
    /// listing, so under [`MissPolicy::FullSync`] a section other than the
    /// configured one falls back to a targeted search instead.
    pub async fn lookup(
        &self,
        policy: MissPolicy,
        section: &str,
        query: &MediaQuery,
    ) -> Result<Vec<MediaRecord>> {
        let field = query.record_field();
        let hits = self.store.search(field, &query.value).await?;
        if !hits.is_empty() {
            debug!(%query, hits = hits.len(), "resolved from cache");
            return Ok(hits.into_iter().map(|doc| doc.into_record()).collect());
        }

        let policy = match policy {
            MissPolicy::FullSync if section != self.default_section() => {
                debug!(section, "section override, using a targeted refresh");
                MissPolicy::Targeted
            }
            policy => policy,
        };
        info!(%query, section, %policy, "cache miss, refreshing from Plex");
        match policy {
            MissPolicy::Targeted => {
                let items = self
                    .catalog
                    .search(section, query.field, &query.value)
                    .await?;
                debug!(%query, found = items.len(), "targeted refresh");
                if !items.is_empty() {
                    self.store
                        .upsert_many(
                            items.into_iter().map(MediaRecord::from).collect(),
                        )
                        .await?;
                }
            }
            MissPolicy::FullSync => {
                self.reconciler.reconcile(Some(section)).await?;
            }
        }

        let hits = self.store.search(field, &query.value).await?;
        if hits.is_empty() {
            info!(%query, section, "no media found after refresh");
        }
        Ok(hits.into_iter().map(|doc| doc.into_record()).collect())
    }
}
