//! Video catalog client.

use crate::error::{CatalogError, Result};
use crate::types::{CatalogConfig, PlaylistItem, PlaylistItemsResponse, VideoListResponse};
use async_trait::async_trait;
use deck_core::{CatalogProvider, TrackDetails, TrackId};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Items requested per playlist page (API maximum)
const PAGE_SIZE: &str = "50";

/// Catalog provider backed by the video Data API.
///
/// # Example
///
/// ```ignore
/// use deck_catalog::{CatalogConfig, VideoCatalog};
///
/// let catalog = VideoCatalog::new(CatalogConfig::new("my-api-key"))?;
/// let ids = catalog.playlist_items("PL123").await?;
/// ```
#[derive(Debug, Clone)]
pub struct VideoCatalog {
    http: Client,
    base_url: Url,
    api_key: String,
    language: Option<String>,
    max_pages: usize,
}

impl VideoCatalog {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let api_key = config.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(CatalogError::MissingCredentials);
        }

        // Trailing slash so endpoint names join onto the path
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(format!("DeckPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
            language: config.language.filter(|l| !l.trim().is_empty()),
            max_pages: config.max_pages.max(1),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Every video id in a playlist, in playlist order.
    ///
    /// Follows `nextPageToken` for at most `max_pages` pages. Items that no
    /// longer reference a video (deleted or private) are skipped.
    pub async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<TrackId>> {
        let mut ids = Vec::new();
        let mut skipped = 0usize;
        let mut page_token: Option<String> = None;

        for page in 1..=self.max_pages {
            let mut url = self.endpoint("playlistItems")?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("part", "contentDetails")
                    .append_pair("maxResults", PAGE_SIZE)
                    .append_pair("playlistId", playlist_id)
                    .append_pair("key", &self.api_key);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            debug!(playlist_id = %playlist_id, page, "Fetching playlist page");
            let response = self.send(url).await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Err(CatalogError::PlaylistNotFound(playlist_id.to_string()));
            }
            let body: PlaylistItemsResponse = read_json(response, "playlist items").await?;

            let before = ids.len();
            ids.extend(
                body.items
                    .iter()
                    .filter_map(PlaylistItem::video_id)
                    .map(TrackId::new),
            );
            skipped += body.items.len() - (ids.len() - before);

            match body.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if page < self.max_pages => page_token = Some(token),
                Some(_) => {
                    warn!(
                        playlist_id = %playlist_id,
                        max_pages = self.max_pages,
                        "Playlist has more pages than allowed, truncating"
                    );
                    break;
                }
                None => break,
            }
        }

        if ids.is_empty() {
            return Err(CatalogError::EmptyPlaylist(playlist_id.to_string()));
        }

        info!(
            playlist_id = %playlist_id,
            videos = ids.len(),
            skipped,
            "Fetched playlist"
        );
        Ok(ids)
    }

    /// Title, channel and best thumbnail for one video.
    pub async fn track_details(&self, id: &TrackId) -> Result<TrackDetails> {
        let mut url = self.endpoint("videos")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("part", "snippet")
                .append_pair("id", id.as_str())
                .append_pair("key", &self.api_key);
            if let Some(language) = &self.language {
                query.append_pair("hl", language);
            }
        }

        debug!(track_id = %id, "Fetching video details");
        let response = self.send(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::TrackNotFound(id.to_string()));
        }
        let body: VideoListResponse = read_json(response, "video details").await?;

        let snippet = body
            .items
            .into_iter()
            .next()
            .and_then(|video| video.snippet)
            .ok_or_else(|| CatalogError::TrackNotFound(id.to_string()))?;

        if snippet.title.trim().is_empty() {
            return Err(CatalogError::MissingTitle(id.to_string()));
        }
        let thumbnail = snippet
            .thumbnails
            .best()
            .ok_or_else(|| CatalogError::MissingThumbnail(id.to_string()))?
            .to_string();

        let localized = snippet.display_title().to_string();
        Ok(
            TrackDetails::new(snippet.channel_title, snippet.title, thumbnail)
                .with_localized_title(localized),
        )
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        self.base_url
            .join(name)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    async fn send(&self, url: Url) -> Result<Response> {
        self.http.get(url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                CatalogError::Unreachable(e.to_string())
            } else {
                CatalogError::Request(e)
            }
        })
    }
}

/// Decode a successful response, mapping the remaining error statuses.
async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(format!("Failed to parse {what}: {e}")))
    } else if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        let message = response.text().await.unwrap_or_default();
        Err(CatalogError::Unauthorized {
            status: status.as_u16(),
            message,
        })
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(CatalogError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CatalogProvider for VideoCatalog {
    async fn fetch_playlist_items(&self, playlist_id: &str) -> deck_core::Result<Vec<TrackId>> {
        Ok(self.playlist_items(playlist_id).await?)
    }

    async fn fetch_track_details(&self, id: &TrackId) -> deck_core::Result<TrackDetails> {
        Ok(self.track_details(id).await?)
    }
}
