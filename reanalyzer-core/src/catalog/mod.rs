//! Outbound access to the remote media catalog.

pub mod plex;

use async_trait::async_trait;
use reanalyzer_model::{RatingKey, RemoteItem, SearchField};

use crate::error::CatalogError;

pub use plex::PlexCatalogClient;

/// Port over the remote catalog: listing, searching and triggering analysis.
///
/// Implementations must not retry state-changing calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Every item in `section`. An empty section yields an empty vec.
    async fn list_all(
        &self,
        section: &str,
    ) -> Result<Vec<RemoteItem>, CatalogError>;

    /// Items in `section` whose `field` equals `value`.
    async fn search(
        &self,
        section: &str,
        field: SearchField,
        value: &str,
    ) -> Result<Vec<RemoteItem>, CatalogError>;

    /// Asks the server to re-analyze one item.
    async fn request_analysis(
        &self,
        rating_key: &RatingKey,
    ) -> Result<(), CatalogError>;
}
