//! JSON document-file backend.
//!
//! The on-disk layout is the one TinyDB uses for its default table, so cache
//! files written by earlier tooling open unchanged:
//!
//! ```json
//! {"_default": {"1": {"ratingKey": 123, "title": "Alien", "fileName": "Alien.mkv"}}}
//! ```

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::PathBuf,
};

use async_trait::async_trait;
use reanalyzer_model::{
    CachedRecord, DocumentId, MediaRecord, RecordChange, RecordField,
    UpsertOutcome,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{CacheStore, Collection};
use crate::error::StoreError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct DocumentFile {
    #[serde(rename = "_default", default)]
    table: BTreeMap<u64, MediaRecord>,
}

/// Store persisted to a single JSON file after every write.
///
/// Writes are staged on a copy of the collection, written to a sibling temp
/// file and renamed over the target. The copy replaces the in-memory
/// collection only once the file is in place, so a failed write changes
/// neither. Writes are serialised by the collection lock.
#[derive(Debug)]
pub struct JsonFileCacheStore {
    path: PathBuf,
    collection: RwLock<Collection>,
}

impl JsonFileCacheStore {
    /// Opens (or lazily creates) the document file at `path`. A missing file
    /// is an empty store; an unreadable or corrupt file is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let collection = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                Collection::new()
            }
            Ok(bytes) => {
                let file: DocumentFile = serde_json::from_slice(&bytes)
                    .map_err(|source| StoreError::Corrupt {
                        path: path.clone(),
                        source,
                    })?;
                let (collection, dropped) = Collection::from_documents(
                    file.table
                        .into_iter()
                        .map(|(id, record)| (DocumentId(id), record)),
                );
                info!(
                    path = %path.display(),
                    documents = collection.len(),
                    dropped,
                    "opened cache file"
                );
                collection
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "cache file not found, starting empty");
                Collection::new()
            }
            Err(source) => {
                return Err(StoreError::Io { path, source });
            }
        };

        Ok(Self {
            path,
            collection: RwLock::new(collection),
        })
    }

    async fn persist(&self, collection: &Collection) -> Result<(), StoreError> {
        let file = DocumentFile {
            table: collection
                .documents()
                .iter()
                .map(|(id, record)| (id.0, record.clone()))
                .collect(),
        };
        let bytes = serde_json::to_vec(&file)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        debug!(
            path = %self.path.display(),
            documents = collection.len(),
            "persisted cache file"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn upsert(
        &self,
        record: MediaRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut collection = self.collection.write().await;
        let mut staged = collection.clone();
        let outcome = staged.upsert(record);
        if outcome.change != RecordChange::Unchanged {
            self.persist(&staged).await?;
            *collection = staged;
        }
        Ok(outcome)
    }

    async fn upsert_many(
        &self,
        records: Vec<MediaRecord>,
    ) -> Result<Vec<UpsertOutcome>, StoreError> {
        let mut collection = self.collection.write().await;
        let mut staged = collection.clone();
        let outcomes: Vec<UpsertOutcome> = records
            .into_iter()
            .map(|record| staged.upsert(record))
            .collect();
        if outcomes
            .iter()
            .any(|o| o.change != RecordChange::Unchanged)
        {
            self.persist(&staged).await?;
            *collection = staged;
        }
        Ok(outcomes)
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
        let mut collection = self.collection.write().await;
        let mut staged = collection.clone();
        let removed = staged.delete(ids);
        if removed > 0 {
            self.persist(&staged).await?;
            *collection = staged;
        }
        Ok(removed)
    }

    async fn list_all(&self) -> Result<Vec<CachedRecord>, StoreError> {
        Ok(self.collection.read().await.all())
    }
}
