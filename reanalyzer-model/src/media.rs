use serde::{Deserialize, Serialize};

use crate::ids::{DocumentId, RatingKey};
use crate::query::RecordField;

/// One cached catalog item.
///
/// Field names on the wire match the documents the cache file has always
/// held (`ratingKey`, `title`, `fileName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "ratingKey")]
    pub rating_key: RatingKey,
    pub title: String,
    #[serde(
        rename = "fileName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_name: Option<String>,
}

impl MediaRecord {
    pub fn new(
        rating_key: impl Into<RatingKey>,
        title: impl Into<String>,
        file_name: Option<String>,
    ) -> Self {
        Self {
            rating_key: rating_key.into(),
            title: title.into(),
            file_name,
        }
    }

    /// Value of `field` on this record, if the record carries it.
    pub fn field(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::RatingKey => Some(self.rating_key.as_str()),
            RecordField::Title => Some(self.title.as_str()),
            RecordField::FileName => self.file_name.as_deref(),
        }
    }

    pub fn matches(&self, field: RecordField, value: &str) -> bool {
        self.field(field) == Some(value)
    }
}

/// A record as it sits in the store, together with its document handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRecord {
    pub doc_id: DocumentId,
    pub record: MediaRecord,
}

impl CachedRecord {
    pub fn rating_key(&self) -> &RatingKey {
        &self.record.rating_key
    }

    pub fn into_record(self) -> MediaRecord {
        self.record
    }
}

/// An item as reported by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub rating_key: RatingKey,
    pub title: String,
    pub file_name: Option<String>,
}

impl RemoteItem {
    /// Builds an item from the full path of its first media part. Only the
    /// basename is kept; both `/` and `\` are treated as separators since the
    /// server may run on either family of OS.
    pub fn from_part_path(
        rating_key: impl Into<RatingKey>,
        title: impl Into<String>,
        part_path: Option<&str>,
    ) -> Self {
        Self {
            rating_key: rating_key.into(),
            title: title.into(),
            file_name: part_path.and_then(basename),
        }
    }

    pub fn into_record(self) -> MediaRecord {
        MediaRecord {
            rating_key: self.rating_key,
            title: self.title,
            file_name: self.file_name,
        }
    }
}

impl From<RemoteItem> for MediaRecord {
    fn from(item: RemoteItem) -> Self {
        item.into_record()
    }
}

fn basename(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
