use std::sync::Arc;

use reanalyzer_model::{AnalysisOutcome, LookupRequest, MissPolicy};
use tracing::{info, warn};

use super::resolver::Resolver;
use crate::cache::CacheStore;
use crate::catalog::CatalogClient;
use crate::error::Result;

/// Resolves a lookup and asks Plex to re-analyze every matching item.
pub struct AnalysisDispatcher {
    catalog: Arc<dyn CatalogClient>,
    resolver: Resolver,
}

impl std::fmt::Debug for AnalysisDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisDispatcher")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl AnalysisDispatcher {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn CacheStore>,
        section: impl Into<String>,
    ) -> Self {
        let resolver = Resolver::new(Arc::clone(&catalog), store, section);
        Self { catalog, resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// One outcome per resolved item, or a single `not_found` outcome.
    ///
    /// Resolution errors fail the whole call. A failed analyze request only
    /// marks its own item as failed; the rest of the batch still runs.
    pub async fn analyze(
        &self,
        request: &LookupRequest,
        policy: MissPolicy,
    ) -> Result<Vec<AnalysisOutcome>> {
        let query = request.query()?;
        let section = request
            .section()
            .unwrap_or(self.resolver.default_section());
        let records = self.resolver.lookup(policy, section, &query).await?;

        if records.is_empty() {
            info!(%query, "no media found");
            return Ok(vec![AnalysisOutcome::not_found(&query)]);
        }

        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            let rating_key = record.rating_key;
            match self.catalog.request_analysis(&rating_key).await {
                Ok(()) => {
                    info!(
                        rating_key = %rating_key,
                        title = %record.title,
                        "sent for analysis"
                    );
                    outcomes
                        .push(AnalysisOutcome::analyzed(rating_key, &query));
                }
                Err(err) => {
                    warn!(
                        rating_key = %rating_key,
                        error = %err,
                        "analysis request failed"
                    );
                    outcomes.push(AnalysisOutcome::failed(rating_key, err));
                }
            }
        }
        Ok(outcomes)
    }
}
