//! Error types for the catalog client.

use deck_core::{DeckError, TrackId};
use thiserror::Error;

/// Errors that can occur when talking to the video catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No API key configured
    #[error("Catalog API key is missing")]
    MissingCredentials,

    /// Invalid base URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog is offline or unreachable
    #[error("Catalog unreachable: {0}")]
    Unreachable(String),

    /// API key rejected
    #[error("Catalog rejected the API key ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Playlist does not exist or is private
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// Playlist resolved to no video ids
    #[error("Playlist has no videos: {0}")]
    EmptyPlaylist(String),

    /// Video does not exist or is unavailable
    #[error("Video not found: {0}")]
    TrackNotFound(String),

    /// Video has no title
    #[error("Video has no title: {0}")]
    MissingTitle(String),

    /// Video has no thumbnail of any size
    #[error("Video has no thumbnail: {0}")]
    MissingThumbnail(String),

    /// Catalog returned an error response
    #[error("Catalog error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse catalog response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<CatalogError> for DeckError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::MissingCredentials
            | CatalogError::InvalidUrl(_)
            | CatalogError::Unauthorized { .. } => DeckError::config(err.to_string()),
            CatalogError::PlaylistNotFound(id) => DeckError::PlaylistNotFound(id),
            CatalogError::EmptyPlaylist(id) => DeckError::EmptyPlaylist(id),
            CatalogError::TrackNotFound(id) => DeckError::TrackNotFound(TrackId::new(id)),
            CatalogError::MissingTitle(id) => DeckError::MissingTitle(TrackId::new(id)),
            CatalogError::MissingThumbnail(id) => DeckError::MissingThumbnail(TrackId::new(id)),
            CatalogError::Request(_) | CatalogError::Unreachable(_) => {
                DeckError::network(err.to_string())
            }
            CatalogError::ServerError { .. } | CatalogError::ParseError(_) => {
                DeckError::catalog(err.to_string())
            }
        }
    }
}
