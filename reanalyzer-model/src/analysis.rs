use serde::{Deserialize, Serialize};

use crate::ids::RatingKey;
use crate::query::MediaQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The analyze request was accepted by the server.
    Analyzed,
    /// The analyze request for this item failed.
    Failed,
    /// The lookup matched nothing, even after refreshing the cache.
    NotFound,
}

/// Result of one unit of an analyze batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_key: Option<RatingKey>,
    pub status: OutcomeStatus,
    pub detail: String,
}

impl AnalysisOutcome {
    pub fn analyzed(rating_key: RatingKey, query: &MediaQuery) -> Self {
        Self {
            rating_key: Some(rating_key),
            status: OutcomeStatus::Analyzed,
            detail: format!(
                "Media '{}' successfully sent for analysis!",
                query.value
            ),
        }
    }

    pub fn failed(rating_key: RatingKey, error: impl std::fmt::Display) -> Self {
        Self {
            rating_key: Some(rating_key),
            status: OutcomeStatus::Failed,
            detail: format!("Error sending request to analyze media: {error}"),
        }
    }

    pub fn not_found(query: &MediaQuery) -> Self {
        Self {
            rating_key: None,
            status: OutcomeStatus::NotFound,
            detail: format!("No media found with {query}"),
        }
    }

    pub fn success(&self) -> bool {
        self.status == OutcomeStatus::Analyzed
    }

    pub fn is_not_found(&self) -> bool {
        self.status == OutcomeStatus::NotFound
    }
}
