/// Core error types for Deck Player
use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `DeckError`
pub type Result<T> = std::result::Result<T, DeckError>;

/// Core error type for Deck Player
#[derive(Error, Debug)]
pub enum DeckError {
    /// Provider configuration is unusable (e.g. missing credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Playlist lookup failed or returned something unusable
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Playlist exists but holds no playable ids
    #[error("Playlist is empty: {0}")]
    EmptyPlaylist(String),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// Track not found in the catalog
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Track metadata lacks a usable title
    #[error("Track has no usable title: {0}")]
    MissingTitle(TrackId),

    /// Track metadata lacks a thumbnail of any known size
    #[error("Track has no usable thumbnail: {0}")]
    MissingThumbnail(TrackId),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Provider call did not finish in time
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl DeckError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Whether this failure means the track itself is unusable, as opposed to
    /// the lookup not going through.
    pub fn is_content_failure(&self) -> bool {
        matches!(
            self,
            Self::TrackNotFound(_) | Self::MissingTitle(_) | Self::MissingThumbnail(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_failures_are_distinguished() {
        let id = TrackId::new("abc");
        assert!(DeckError::MissingThumbnail(id.clone()).is_content_failure());
        assert!(DeckError::TrackNotFound(id).is_content_failure());
        assert!(!DeckError::network("connection reset").is_content_failure());
        assert!(!DeckError::Timeout(std::time::Duration::from_secs(1)).is_content_failure());
    }

    #[test]
    fn messages_carry_the_id() {
        let err = DeckError::MissingThumbnail(TrackId::new("xyz"));
        assert_eq!(err.to_string(), "Track has no usable thumbnail: xyz");
    }
}
