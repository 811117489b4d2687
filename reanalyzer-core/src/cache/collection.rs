use std::collections::{BTreeMap, HashMap};

use reanalyzer_model::{
    CachedRecord, DocumentId, MediaRecord, RatingKey, RecordField,
    UpsertOutcome,
};
use tracing::warn;

/// In-memory table shared by the store backends.
///
/// Documents are ordered by handle; `by_key` indexes the unique rating key.
#[derive(Debug, Default, Clone)]
pub struct Collection {
    documents: BTreeMap<DocumentId, MediaRecord>,
    by_key: HashMap<RatingKey, DocumentId>,
    last_id: DocumentId,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a collection from persisted documents.
    ///
    /// A file edited by hand, or written by a tool without upsert semantics,
    /// can hold several documents for one rating key; only the oldest is
    /// kept. The second value is the number of dropped duplicates.
    pub fn from_documents(
        documents: impl IntoIterator<Item = (DocumentId, MediaRecord)>,
    ) -> (Self, usize) {
        let mut collection = Collection::new();
        let mut dropped = 0;

        let sorted: BTreeMap<DocumentId, MediaRecord> =
            documents.into_iter().collect();
        for (doc_id, record) in sorted {
            collection.last_id = collection.last_id.max(doc_id);
            if collection.by_key.contains_key(&record.rating_key) {
                warn!(
                    rating_key = %record.rating_key,
                    doc_id = %doc_id,
                    "dropping duplicate cache document"
                );
                dropped += 1;
                continue;
            }
            collection.by_key.insert(record.rating_key.clone(), doc_id);
            collection.documents.insert(doc_id, record);
        }

        (collection, dropped)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn upsert(&mut self, record: MediaRecord) -> UpsertOutcome {
        if let Some(doc_id) = self.by_key.get(&record.rating_key).copied() {
            let stored = self
                .documents
                .entry(doc_id)
                .or_insert_with(|| record.clone());
            if *stored == record {
                return UpsertOutcome::unchanged(doc_id);
            }
            *stored = record;
            return UpsertOutcome::updated(doc_id);
        }

        let doc_id = self.last_id.next();
        self.last_id = doc_id;
        self.by_key.insert(record.rating_key.clone(), doc_id);
        self.documents.insert(doc_id, record);
        UpsertOutcome::created(doc_id)
    }

    pub fn search(&self, field: RecordField, value: &str) -> Vec<CachedRecord> {
        if field == RecordField::RatingKey {
            return self
                .by_key
                .get(&RatingKey::new(value))
                .and_then(|doc_id| self.cached(*doc_id))
                .into_iter()
                .collect();
        }

        self.documents
            .iter()
            .filter(|(_, record)| record.matches(field, value))
            .map(|(doc_id, record)| CachedRecord {
                doc_id: *doc_id,
                record: record.clone(),
            })
            .collect()
    }

    pub fn delete(&mut self, ids: &[DocumentId]) -> usize {
        let mut removed = 0;
        for doc_id in ids {
            if let Some(record) = self.documents.remove(doc_id) {
                if self.by_key.get(&record.rating_key) == Some(doc_id) {
                    self.by_key.remove(&record.rating_key);
                }
                removed += 1;
            }
        }
        removed
    }

    pub fn all(&self) -> Vec<CachedRecord> {
        self.documents
            .iter()
            .map(|(doc_id, record)| CachedRecord {
                doc_id: *doc_id,
                record: record.clone(),
            })
            .collect()
    }

    pub fn documents(&self) -> &BTreeMap<DocumentId, MediaRecord> {
        &self.documents
    }

    fn cached(&self, doc_id: DocumentId) -> Option<CachedRecord> {
        self.documents.get(&doc_id).map(|record| CachedRecord {
            doc_id,
            record: record.clone(),
        })
    }
}
