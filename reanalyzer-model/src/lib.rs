//! Core data model definitions shared across the reanalyzer crates.
//!
//! The cache mirrors a single Plex library section. Each cached document is a
//! [`MediaRecord`] keyed by the item's [`RatingKey`]; lookups arrive as a
//! [`LookupRequest`] and are validated into a [`MediaQuery`] before anything
//! touches the store or the remote server.

pub mod analysis;
pub mod error;
pub mod ids;
pub mod media;
pub mod policy;
pub mod query;
pub mod sync;

pub use analysis::{AnalysisOutcome, OutcomeStatus};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{DocumentId, RatingKey};
pub use media::{CachedRecord, MediaRecord, RemoteItem};
pub use policy::MissPolicy;
pub use query::{LookupRequest, MediaQuery, RecordField, SearchField};
pub use sync::{ReconcileReport, RecordChange, UpsertOutcome};
