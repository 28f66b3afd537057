//! Google Books volumes API provider.
//!
//! Queries `GET {base_url}?q=isbn:{isbn}[&key=...]` and maps the first
//! volume to [`BookMetadata`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{BookMetadata, BookMetadataProvider, LookupError};

/// Public endpoint of the volumes API.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Default timeout for a single lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    subtitle: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    description: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Looks up ISBNs against the Google Books volumes API.
pub struct GoogleBooksProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksProvider {
    /// Build a provider with its own HTTP client bounded by `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        api_key: Option<String>,
    ) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl BookMetadataProvider for GoogleBooksProvider {
    async fn lookup(&self, isbn: &str) -> Result<Option<BookMetadata>, LookupError> {
        let query = format!("isbn:{isbn}");
        let mut request = self.client.get(&self.base_url).query(&[("q", query.as_str())]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus(status.as_u16()));
        }

        let body: VolumesResponse = response.json().await?;
        let metadata = to_metadata(isbn, body);
        tracing::debug!(isbn, found = metadata.is_some(), "Google Books lookup");
        Ok(metadata)
    }
}

/// Map the first usable volume of a response to [`BookMetadata`].
///
/// A volume without a title is skipped. Cover links are upgraded to HTTPS.
fn to_metadata(isbn: &str, response: VolumesResponse) -> Option<BookMetadata> {
    response
        .items
        .into_iter()
        .map(|item| item.volume_info)
        .find(|info| info.title.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .map(|info| {
            let title = match (info.title, info.subtitle) {
                (Some(title), Some(subtitle)) if !subtitle.trim().is_empty() => {
                    format!("{title}: {subtitle}")
                }
                (Some(title), _) => title,
                (None, _) => String::new(),
            };
            let cover_url = info
                .image_links
                .and_then(|links| links.thumbnail.or(links.small_thumbnail))
                .map(|url| url.replacen("http://", "https://", 1));
            BookMetadata {
                isbn: isbn.to_string(),
                title,
                author: info.authors.join(", "),
                description: info.description,
                cover_url,
                genre: info.categories.into_iter().next(),
            }
        })
}
