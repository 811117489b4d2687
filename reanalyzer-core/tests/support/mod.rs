//! In-process catalog double shared by the core integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use reanalyzer_core::CatalogClient;
use reanalyzer_core::error::CatalogError;
use reanalyzer_model::{RatingKey, RemoteItem, SearchField};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub list_all: usize,
    pub search: usize,
    pub analyze: usize,
}

/// Catalog whose sections are plain vectors, with call counters and
/// switchable failures.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    sections: Mutex<HashMap<String, Vec<RemoteItem>>>,
    failing_analysis: Mutex<HashSet<RatingKey>>,
    offline: Mutex<bool>,
    calls: Mutex<CallCounts>,
    analyzed: Mutex<Vec<RatingKey>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(
        self,
        section: &str,
        items: impl IntoIterator<Item = RemoteItem>,
    ) -> Self {
        self.set_section(section, items);
        self
    }

    pub fn set_section(
        &self,
        section: &str,
        items: impl IntoIterator<Item = RemoteItem>,
    ) {
        self.sections
            .lock()
            .unwrap()
            .insert(section.to_string(), items.into_iter().collect());
    }

    pub fn fail_analysis_of(&self, rating_key: impl Into<RatingKey>) {
        self.failing_analysis
            .lock()
            .unwrap()
            .insert(rating_key.into());
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    pub fn analyzed(&self) -> Vec<RatingKey> {
        self.analyzed.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<(), CatalogError> {
        if *self.offline.lock().unwrap() {
            return Err(CatalogError::Status {
                status: 503,
                body: "Plex is offline".into(),
            });
        }
        Ok(())
    }

    fn section(&self, section: &str) -> Result<Vec<RemoteItem>, CatalogError> {
        self.sections
            .lock()
            .unwrap()
            .get(section)
            .cloned()
            .ok_or_else(|| CatalogError::SectionNotFound(section.to_string()))
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn list_all(
        &self,
        section: &str,
    ) -> Result<Vec<RemoteItem>, CatalogError> {
        self.calls.lock().unwrap().list_all += 1;
        self.check_online()?;
        self.section(section)
    }

    async fn search(
        &self,
        section: &str,
        field: SearchField,
        value: &str,
    ) -> Result<Vec<RemoteItem>, CatalogError> {
        self.calls.lock().unwrap().search += 1;
        self.check_online()?;
        Ok(self
            .section(section)?
            .into_iter()
            .filter(|item| match field {
                SearchField::Title => item.title == value,
                SearchField::FileName => {
                    item.file_name.as_deref() == Some(value)
                }
            })
            .collect())
    }

    async fn request_analysis(
        &self,
        rating_key: &RatingKey,
    ) -> Result<(), CatalogError> {
        self.calls.lock().unwrap().analyze += 1;
        self.check_online()?;
        if self.failing_analysis.lock().unwrap().contains(rating_key) {
            return Err(CatalogError::Status {
                status: 500,
                body: format!("cannot analyze {rating_key}"),
            });
        }
        self.analyzed.lock().unwrap().push(rating_key.clone());
        Ok(())
    }
}

pub fn movie(rating_key: u64, title: &str, path: &str) -> RemoteItem {
    RemoteItem::from_part_path(rating_key, title, Some(path))
}
