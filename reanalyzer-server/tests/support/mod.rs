#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use reanalyzer_core::{CatalogClient, CatalogError, MemoryCacheStore};
use reanalyzer_model::{MissPolicy, RatingKey, RemoteItem, SearchField};
use reanalyzer_server::{AppState, auth::SharedSecretGuard, create_app};

pub const SECRET: &str = "let-me-in";

/// Single-section catalog that can be switched offline.
#[derive(Debug, Default)]
pub struct StubCatalog {
    pub items: Mutex<Vec<RemoteItem>>,
    pub offline: Mutex<bool>,
    pub analyzed: Mutex<Vec<RatingKey>>,
}

impl StubCatalog {
    pub fn with_items(items: impl IntoIterator<Item = RemoteItem>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().collect()),
            ..Default::default()
        }
    }

    fn online(&self) -> Result<(), CatalogError> {
        if *self.offline.lock().unwrap() {
            Err(CatalogError::Status {
                status: 401,
                body: "Unauthorized".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn list_all(
        &self,
        _section: &str,
    ) -> Result<Vec<RemoteItem>, CatalogError> {
        self.online()?;
        Ok(self.items.lock().unwrap().clone())
    }

    async fn search(
        &self,
        _section: &str,
        field: SearchField,
        value: &str,
    ) -> Result<Vec<RemoteItem>, CatalogError> {
        self.online()?;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| match field {
                SearchField::Title => item.title == value,
                SearchField::FileName => {
                    item.file_name.as_deref() == Some(value)
                }
            })
            .cloned()
            .collect())
    }

    async fn request_analysis(
        &self,
        rating_key: &RatingKey,
    ) -> Result<(), CatalogError> {
        self.online()?;
        self.analyzed.lock().unwrap().push(rating_key.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub catalog: Arc<StubCatalog>,
    pub store: Arc<MemoryCacheStore>,
}

pub fn build_test_app(secret: Option<&str>) -> TestApp {
    let catalog = Arc::new(StubCatalog::with_items([
        RemoteItem::from_part_path(
            101u64,
            "Alien",
            Some("/movies/Alien (1979)/Alien.1979.mkv"),
        ),
        RemoteItem::from_part_path(
            102u64,
            "Heat",
            Some("/movies/Heat (1995)/Heat.1995.mkv"),
        ),
    ]));
    let store = Arc::new(MemoryCacheStore::new());
    let state = AppState::new(
        catalog.clone(),
        store.clone(),
        "Movies",
        MissPolicy::Targeted,
        SharedSecretGuard::new(secret.map(str::to_string)),
    );
    let server = TestServer::new(create_app(state)).unwrap();
    TestApp {
        server,
        catalog,
        store,
    }
}
