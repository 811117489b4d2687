use async_trait::async_trait;
use reanalyzer_model::{
    CachedRecord, DocumentId, MediaRecord, RecordField, UpsertOutcome,
};
use tokio::sync::RwLock;

use super::{CacheStore, Collection};
use crate::error::StoreError;

/// Process-local store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    collection: RwLock<Collection>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = MediaRecord>) -> Self {
        let mut collection = Collection::new();
        for record in records {
            collection.upsert(record);
        }
        Self {
            collection: RwLock::new(collection),
        }
    }

    pub async fn len(&self) -> usize {
        self.collection.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.collection.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn upsert(
        &self,
        record: MediaRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        Ok(self.collection.write().await.upsert(record))
    }

    async fn search(
        &self,
        field: RecordField,
        value: &str,
    ) -> Result<Vec<CachedRecord>, StoreError> {
        Ok(self.collection.read().await.search(field, value))
    }

    async fn delete_by_ids(
        &self,
        ids: &[DocumentId],
    ) -> Result<usize, StoreError> {
        Ok(self.collection.write().await.delete(ids))
    }

    async fn list_all(&self) -> Result<Vec<CachedRecord>, StoreError> {
        Ok(self.collection.read().await.all())
    }
}
