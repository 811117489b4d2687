use reanalyzer_model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the remote catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("request to Plex failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Plex responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed Plex response: {0}")]
    Malformed(String),

    #[error("library section '{0}' not found on the Plex server")]
    SectionNotFound(String),

    #[error("invalid Plex server URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Failures reading or writing the local document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cache file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file {path} is not a valid document file: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize cache documents: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ReanalyzeError {
    #[error("upstream error: {0}")]
    Upstream(#[from] CatalogError),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("cache store error: {0}")]
    Store(#[from] StoreError),
}

impl ReanalyzeError {
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, ReanalyzeError::InvalidQuery(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, ReanalyzeError::Upstream(_))
    }
}

impl From<ModelError> for ReanalyzeError {
    fn from(err: ModelError) -> Self {
        ReanalyzeError::InvalidQuery(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReanalyzeError>;
