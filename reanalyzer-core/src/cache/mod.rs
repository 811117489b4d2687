//! Local document store holding one [`MediaRecord`] per rating key.
//!
//! Every backend serialises its own operations, so callers never need an
//! external lock. Writes are idempotent upserts or deletes by handle, which
//! makes interleaving concurrent reconciles and lookups safe.

mod collection;
pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use reanalyzer_model::{
    CachedRecord, DocumentId, MediaRecord, RecordField, UpsertOutcome,
};

use crate::error::StoreError;

pub use collection::Collection;
pub use json_file::JsonFileCacheStore;
pub use memory::MemoryCacheStore;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Inserts `record`, or replaces the document with the same rating key.
    async fn upsert(
        &self,
        record: MediaRecord,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Upserts every record in order. Backends that persist may override this
    /// to write once per batch.
    async fn upsert_many(
        &self,
        records: Vec<MediaRecord>,
    ) -> Result<Vec<UpsertOutcome>, StoreError> {
        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            outcomes.push(self.upsert(record).await?);
        }
        Ok(outcomes)
    }

    /// Exact-match search. No match is an empty vec.
    async fn search(
        &self,
        field: RecordField,
        value: &str,
    ) -> Result<Vec<CachedRecord>, StoreError>;

    /// Removes the given handles; unknown handles are ignored. Returns how
    /// many documents were actually removed.
    async fn delete_by_ids(
        &self,
        ids: &[DocumentId],
    ) -> Result<usize, StoreError>;

    async fn list_all(&self) -> Result<Vec<CachedRecord>, StoreError>;
}
