use serde::{Deserialize, Deserializer, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// Plex's stable identifier for one catalog item.
///
/// Plex serves rating keys as strings in its JSON API, while the TinyDB files
/// written by earlier tooling stored them as integers, so both forms are
/// accepted on read. The canonical in-memory form is the string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RatingKey(String);

impl RatingKey {
    pub fn new(raw: impl Into<String>) -> Self {
        RatingKey(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for RatingKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => RatingKey(text),
            Raw::Number(number) => RatingKey(number.to_string()),
        })
    }
}

impl From<u64> for RatingKey {
    fn from(value: u64) -> Self {
        RatingKey(value.to_string())
    }
}

impl From<&str> for RatingKey {
    fn from(value: &str) -> Self {
        RatingKey(value.to_string())
    }
}

impl From<String> for RatingKey {
    fn from(value: String) -> Self {
        RatingKey(value)
    }
}

impl FromStr for RatingKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RatingKey(s.trim().to_string()))
    }
}

impl AsRef<str> for RatingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RatingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Internal handle of a document inside the cache store.
///
/// Handles are assigned by the store on insert and are never reused while the
/// store is open.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl DocumentId {
    pub fn next(self) -> Self {
        DocumentId(self.0 + 1)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
