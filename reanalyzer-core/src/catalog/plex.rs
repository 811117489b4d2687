use std::{fmt, time::Duration};

use async_trait::async_trait;
use dashmap::DashMap;
use reanalyzer_model::{RatingKey, RemoteItem, SearchField};
use reqwest::{Method, header};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, info, warn};
use url::Url;

use super::CatalogClient;
use crate::error::CatalogError;

const TOKEN_HEADER: &str = "X-Plex-Token";
const PRODUCT_HEADER: &str = "X-Plex-Product";
const PRODUCT_NAME: &str = "reanalyzer";
const MAX_ERROR_BODY: usize = 512;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`CatalogClient`] backed by a Plex Media Server's HTTP API.
pub struct PlexCatalogClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    /// Section title -> section key, filled lazily.
    section_keys: DashMap<String, String>,
}

impl fmt::Debug for PlexCatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlexCatalogClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl PlexCatalogClient {
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        default_headers.insert(
            PRODUCT_HEADER,
            header::HeaderValue::from_static(PRODUCT_NAME),
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: token.into(),
            section_keys: DashMap::new(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
    ) -> Result<reqwest::Response, CatalogError> {
        debug!(%method, path = url.path(), "plex request");
        let response = self
            .http
            .request(method, url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|idx| body.is_char_boundary(*idx))
                .unwrap_or(0);
            body.truncate(cut);
        }
        Err(CatalogError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T>(&self, url: Url) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, url).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| CatalogError::Malformed(err.to_string()))
    }

    /// Resolves a section title (or raw key) to the key Plex routes on.
    async fn section_key(&self, section: &str) -> Result<String, CatalogError> {
        if let Some(key) = self.section_keys.get(section) {
            return Ok(key.clone());
        }

        let envelope: Envelope<SectionsContainer> = self
            .get_json(self.endpoint(&["library", "sections"]))
            .await?;
        let directories = envelope.container.directories;

        let key = directories
            .iter()
            .find(|dir| dir.title == section)
            .or_else(|| directories.iter().find(|dir| dir.key == section))
            .map(|dir| dir.key.clone())
            .ok_or_else(|| CatalogError::SectionNotFound(section.to_string()))?;

        debug!(section, key = %key, "resolved library section");
        self.section_keys.insert(section.to_string(), key.clone());
        Ok(key)
    }

    async fn section_items(
        &self,
        section: &str,
        title_filter: Option<&str>,
    ) -> Result<Vec<RemoteItem>, CatalogError> {
        let key = self.section_key(section).await?;
        let mut url = self.endpoint(&["library", "sections", &key, "all"]);
        if let Some(title) = title_filter {
            url.query_pairs_mut().append_pair("title", title);
        }

        let envelope: Envelope<MetadataContainer> = self.get_json(url).await?;
        Ok(envelope
            .container
            .metadata
            .into_iter()
            .map(MetadataItem::into_remote_item)
            .collect())
    }
}

#[async_trait]
impl CatalogClient for PlexCatalogClient {
    async fn list_all(
        &self,
        section: &str,
    ) -> Result<Vec<RemoteItem>, CatalogError> {
        let items = self.section_items(section, None).await?;
        info!(section, count = items.len(), "listed library section");
        Ok(items)
    }

    async fn search(
        &self,
        section: &str,
        field: SearchField,
        value: &str,
    ) -> Result<Vec<RemoteItem>, CatalogError> {
        let items = match field {
            // Plex's title filter is a substring match; keep exact hits only.
            SearchField::Title => self
                .section_items(section, Some(value))
                .await?
                .into_iter()
                .filter(|item| item.title == value)
                .collect::<Vec<_>>(),
            // No server-side basename filter exists.
            SearchField::FileName => self
                .section_items(section, None)
                .await?
                .into_iter()
                .filter(|item| item.file_name.as_deref() == Some(value))
                .collect(),
        };

        if items.is_empty() {
            warn!(section, %field, value, "no results found in Plex");
        } else {
            debug!(section, %field, value, count = items.len(), "plex search");
        }
        Ok(items)
    }

    async fn request_analysis(
        &self,
        rating_key: &RatingKey,
    ) -> Result<(), CatalogError> {
        let url = self.endpoint(&[
            "library",
            "metadata",
            rating_key.as_str(),
            "analyze",
        ]);
        self.send(Method::PUT, url).await?;
        info!(rating_key = %rating_key, "requested media analysis");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    container: T,
}

#[derive(Debug, Deserialize)]
struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    directories: Vec<SectionDirectory>,
}

#[derive(Debug, Deserialize)]
struct SectionDirectory {
    key: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<MetadataItem>,
}

#[derive(Debug, Deserialize)]
struct MetadataItem {
    #[serde(rename = "ratingKey")]
    rating_key: RatingKey,
    #[serde(default)]
    title: String,
    #[serde(rename = "Media", default)]
    media: Vec<MediaEntry>,
}

#[derive(Debug, Deserialize)]
struct MediaEntry {
    #[serde(rename = "Part", default)]
    parts: Vec<MediaPart>,
}

#[derive(Debug, Deserialize)]
struct MediaPart {
    #[serde(default)]
    file: Option<String>,
}

impl MetadataItem {
    fn into_remote_item(self) -> RemoteItem {
        let first_file = self
            .media
            .first()
            .and_then(|media| media.parts.first())
            .and_then(|part| part.file.as_deref());
        RemoteItem::from_part_path(self.rating_key, self.title, first_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_listing_maps_first_part_basename() {
        let json = r#"{
            "MediaContainer": {
                "size": 2,
                "Metadata": [
                    {
                        "ratingKey": "101",
                        "title": "Movie A",
                        "Media": [
                            {"Part": [{"file": "/media/Movie A/movie-a.mkv"}, {"file": "/media/Movie A/cd2.mkv"}]},
                            {"Part": [{"file": "/other/alt.mkv"}]}
                        ]
                    },
                    {"ratingKey": "102", "title": "Show Without Media"}
                ]
            }
        }"#;
        let envelope: Envelope<MetadataContainer> =
            serde_json::from_str(json).unwrap();
        let items: Vec<RemoteItem> = envelope
            .container
            .metadata
            .into_iter()
            .map(MetadataItem::into_remote_item)
            .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].file_name.as_deref(), Some("movie-a.mkv"));
        assert_eq!(items[1].file_name, None);
    }

    #[test]
    fn empty_section_container_has_no_metadata_key() {
        let envelope: Envelope<MetadataContainer> =
            serde_json::from_str(r#"{"MediaContainer": {"size": 0}}"#).unwrap();
        assert!(envelope.container.metadata.is_empty());
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = PlexCatalogClient::new(
            "http://plex.local:32400/proxy/",
            "token",
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        let url = client.endpoint(&["library", "metadata", "42", "analyze"]);
        assert_eq!(
            url.as_str(),
            "http://plex.local:32400/proxy/library/metadata/42/analyze"
        );
    }

    #[test]
    fn debug_output_redacts_token() {
        let client = PlexCatalogClient::new(
            "http://plex.local:32400",
            "super-secret",
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            PlexCatalogClient::new("mailto:plex@example.com", "t", DEFAULT_TIMEOUT),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            PlexCatalogClient::new("not a url", "t", DEFAULT_TIMEOUT),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
    }
}
