//! Keeps a local cache of one Plex library section and uses it to turn a
//! title or filename into rating keys that can be sent for re-analysis.
//!
//! The crate is split along its two outbound ports, [`catalog::CatalogClient`]
//! and [`cache::CacheStore`], with the [`domain`] services wired on top.

pub mod cache;
pub mod catalog;
pub mod domain;
pub mod error;

pub use cache::{CacheStore, JsonFileCacheStore, MemoryCacheStore};
pub use catalog::{CatalogClient, PlexCatalogClient};
pub use domain::{AnalysisDispatcher, Reconciler, Resolver};
pub use error::{CatalogError, ReanalyzeError, Result, StoreError};
