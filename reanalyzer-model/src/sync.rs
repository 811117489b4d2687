use serde::{Deserialize, Serialize};

use crate::ids::DocumentId;

/// What an upsert did to the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordChange {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub doc_id: DocumentId,
    pub change: RecordChange,
}

impl UpsertOutcome {
    pub fn created(doc_id: DocumentId) -> Self {
        Self {
            doc_id,
            change: RecordChange::Created,
        }
    }

    pub fn updated(doc_id: DocumentId) -> Self {
        Self {
            doc_id,
            change: RecordChange::Updated,
        }
    }

    pub fn unchanged(doc_id: DocumentId) -> Self {
        Self {
            doc_id,
            change: RecordChange::Unchanged,
        }
    }
}

/// Counts produced by one full reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub section: String,
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
}

impl ReconcileReport {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, change: RecordChange) {
        match change {
            RecordChange::Created => self.added += 1,
            RecordChange::Updated => self.updated += 1,
            RecordChange::Unchanged => self.unchanged += 1,
        }
    }

    /// Whether the pass modified the cache at all.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.removed == 0
    }

    /// Number of records in the cache after the pass.
    pub fn total(&self) -> usize {
        self.added + self.updated + self.unchanged
    }
}
