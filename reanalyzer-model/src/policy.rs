use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// How a lookup refreshes the cache after a miss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Search the remote section for the one field/value pair and upsert the
    /// hits.
    #[default]
    Targeted,
    /// Run a full reconciliation of the section.
    FullSync,
}

impl MissPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissPolicy::Targeted => "targeted",
            MissPolicy::FullSync => "full_sync",
        }
    }
}

impl FromStr for MissPolicy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "targeted" => Ok(MissPolicy::Targeted),
            "full_sync" | "full-sync" | "sync" => Ok(MissPolicy::FullSync),
            other => Err(ModelError::UnknownMissPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
