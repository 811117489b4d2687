use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{ModelError, Result};

/// Fields the remote catalog can be searched by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "fileName")]
    FileName,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::FileName => "fileName",
        }
    }
}

impl FromStr for SearchField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "title" => Ok(SearchField::Title),
            "fileName" | "filename" => Ok(SearchField::FileName),
            other => Err(ModelError::UnsupportedField(other.to_string())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields the local cache can be searched by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordField {
    #[serde(rename = "ratingKey")]
    RatingKey,
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "fileName")]
    FileName,
}

impl RecordField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::RatingKey => "ratingKey",
            RecordField::Title => "title",
            RecordField::FileName => "fileName",
        }
    }
}

impl FromStr for RecordField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ratingKey" => Ok(RecordField::RatingKey),
            other => other.parse::<SearchField>().map(RecordField::from),
        }
    }
}

impl From<SearchField> for RecordField {
    fn from(field: SearchField) -> Self {
        match field {
            SearchField::Title => RecordField::Title,
            SearchField::FileName => RecordField::FileName,
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A human-supplied lookup, as received from the HTTP body or the CLI.
///
/// Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_section: Option<String>,
}

impl LookupRequest {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn by_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.library_section = Some(section.into());
        self
    }

    /// Validates that exactly one identifying field is set.
    pub fn query(&self) -> Result<MediaQuery> {
        match (non_blank(&self.title), non_blank(&self.filename)) {
            (Some(title), None) => Ok(MediaQuery::title(title)),
            (None, Some(filename)) => Ok(MediaQuery::file_name(filename)),
            (None, None) => Err(ModelError::MissingLookupField),
            (Some(_), Some(_)) => Err(ModelError::AmbiguousLookup),
        }
    }

    /// Section override carried by the request, if any.
    pub fn section(&self) -> Option<&str> {
        non_blank(&self.library_section)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// A validated single-field lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaQuery {
    pub field: SearchField,
    pub value: String,
}

impl MediaQuery {
    pub fn new(field: SearchField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn title(value: impl Into<String>) -> Self {
        Self::new(SearchField::Title, value)
    }

    pub fn file_name(value: impl Into<String>) -> Self {
        Self::new(SearchField::FileName, value)
    }

    pub fn record_field(&self) -> RecordField {
        self.field.into()
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.field, self.value)
    }
}
