//! Types for catalog configuration and API responses.

use serde::{Deserialize, Serialize};

/// Public Data API v3 endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Configuration for the catalog client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the API (e.g. "https://www.googleapis.com/youtube/v3")
    pub base_url: String,
    /// API key sent with every request
    pub api_key: String,
    /// Display language for localized titles (`hl` parameter)
    pub language: Option<String>,
    /// Upper bound on playlist pages followed
    pub max_pages: usize,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl CatalogConfig {
    /// Create a config for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Point the client at another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            language: None,
            max_pages: 20,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

// =============================================================================
// Playlist Types
// =============================================================================

/// One page of `playlistItems`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub content_details: Option<ContentDetails>,
}

impl PlaylistItem {
    /// Video id, if the item still points at one
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|details| details.video_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub video_id: Option<String>,
}

// =============================================================================
// Video Types
// =============================================================================

/// Response from `videos`.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub localized: Option<Localized>,
}

impl Snippet {
    /// Localized title, or the plain title when there is none
    pub fn display_title(&self) -> &str {
        self.localized
            .as_ref()
            .map(|l| l.title.as_str())
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(&self.title)
    }
}

#[derive(Debug, Deserialize)]
pub struct Localized {
    #[serde(default)]
    pub title: String,
}

/// Thumbnails keyed by size name.
#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// Largest available thumbnail URL
    ///
    /// Preference: maxres, standard, high, medium, default.
    pub fn best(&self) -> Option<&str> {
        [
            &self.maxres,
            &self.standard,
            &self.high,
            &self.medium,
            &self.default,
        ]
        .into_iter()
        .flatten()
        .map(|thumbnail| thumbnail.url.as_str())
        .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
