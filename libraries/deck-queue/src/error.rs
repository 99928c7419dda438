//! Error types for queue management

use deck_core::{DeckError, TrackId};
use thiserror::Error;

/// Banner text when every retry hop failed validation
pub const VALIDATION_FAILED_MESSAGE: &str = "Track validation failed";

/// Banner text when a transition could not even locate its target
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load track";

/// Queue errors
#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue holds no tracks
    #[error("Queue is empty")]
    QueueEmpty,

    /// Transition target is not part of the playlist
    #[error("Track not in playlist: {0}")]
    TrackNotInPlaylist(TrackId),

    /// Initial attempt and every retry hop failed validation
    #[error("Track validation failed after {attempts} attempts")]
    ValidationExhausted {
        /// Number of validation attempts made
        attempts: usize,
    },

    /// Catalog error during initialization
    #[error(transparent)]
    Catalog(#[from] DeckError),
}

impl QueueError {
    /// User-facing message for the error display
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationExhausted { .. } => VALIDATION_FAILED_MESSAGE.to_string(),
            Self::TrackNotInPlaylist(_) | Self::QueueEmpty => LOAD_FAILED_MESSAGE.to_string(),
            Self::Catalog(err) => err.to_string(),
        }
    }
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;
