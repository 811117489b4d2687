use std::{fmt, sync::Arc};

use reanalyzer_core::{
    AnalysisDispatcher, CacheStore, CatalogClient, Reconciler,
};
use reanalyzer_model::MissPolicy;

use crate::auth::SharedSecretGuard;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<AnalysisDispatcher>,
    pub guard: Arc<SharedSecretGuard>,
    pub miss_policy: MissPolicy,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("miss_policy", &self.miss_policy)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn CacheStore>,
        library_section: impl Into<String>,
        miss_policy: MissPolicy,
        guard: SharedSecretGuard,
    ) -> Self {
        Self {
            dispatcher: Arc::new(AnalysisDispatcher::new(
                catalog,
                store,
                library_section,
            )),
            guard: Arc::new(guard),
            miss_policy,
        }
    }

    pub fn reconciler(&self) -> &Reconciler {
        self.dispatcher.resolver().reconciler()
    }
}
