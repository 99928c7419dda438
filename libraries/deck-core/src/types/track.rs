/// Track domain types
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Display metadata for a track, as returned by the catalog
///
/// Immutable once fetched. `cover_image_url` is never empty: a catalog entry
/// without any usable image fails validation instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDetails {
    /// Artist (or uploading channel) name
    pub artist: String,

    /// Track title
    pub title: String,

    /// Best available cover image
    pub cover_image_url: String,

    /// Title in the viewer's language, falls back to `title`
    pub localized_title: String,
}

impl TrackDetails {
    /// Create details whose localized title equals the title
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        cover_image_url: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            artist: artist.into(),
            localized_title: title.clone(),
            title,
            cover_image_url: cover_image_url.into(),
        }
    }

    /// Set the localized title
    #[must_use]
    pub fn with_localized_title(mut self, localized_title: impl Into<String>) -> Self {
        self.localized_title = localized_title.into();
        self
    }
}

/// Result of validating a track id against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedTrack {
    /// Track identifier
    pub id: TrackId,

    /// Fetched metadata
    pub details: TrackDetails,

    /// Only valid entries are usable for playback
    pub is_valid: bool,
}

impl ValidatedTrack {
    /// Create a valid entry
    pub fn valid(id: TrackId, details: TrackDetails) -> Self {
        Self {
            id,
            details,
            is_valid: true,
        }
    }
}

/// Denormalized track view handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Cover image to display
    pub cover_image_url: String,

    /// Artist name
    pub artist: String,

    /// Title in the viewer's language
    pub localized_title: String,
}

impl From<&ValidatedTrack> for Track {
    fn from(validated: &ValidatedTrack) -> Self {
        Self {
            id: validated.id.clone(),
            title: validated.details.title.clone(),
            cover_image_url: validated.details.cover_image_url.clone(),
            artist: validated.details.artist.clone(),
            localized_title: validated.details.localized_title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_title_defaults_to_title() {
        let details = TrackDetails::new("Artist", "Song", "https://img/cover.jpg");
        assert_eq!(details.localized_title, "Song");

        let details = details.with_localized_title("Chanson");
        assert_eq!(details.title, "Song");
        assert_eq!(details.localized_title, "Chanson");
    }

    #[test]
    fn track_view_copies_display_fields() {
        let validated = ValidatedTrack::valid(
            TrackId::new("t1"),
            TrackDetails::new("Artist", "Song", "https://img/cover.jpg"),
        );
        let track = Track::from(&validated);

        assert_eq!(track.id, validated.id);
        assert_eq!(track.cover_image_url, "https://img/cover.jpg");
        assert_eq!(track.artist, "Artist");
    }
}
