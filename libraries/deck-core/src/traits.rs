/// Core traits for Deck Player
use crate::error::Result;
use crate::types::{TrackDetails, TrackId};
use async_trait::async_trait;

/// Catalog metadata provider
///
/// The queue engine's only view of the outside catalog. Implementers resolve a
/// playlist into its raw track ids and a single track id into its metadata.
///
/// Implementations must be cheap to share (`Arc<dyn CatalogProvider>`) since
/// validations run concurrently from background tasks.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the raw, unshuffled list of track ids in a playlist
    ///
    /// # Errors
    /// Returns an error if the playlist is empty, not found, or the response
    /// is malformed
    async fn fetch_playlist_items(&self, playlist_id: &str) -> Result<Vec<TrackId>>;

    /// Fetch display metadata for a single track
    ///
    /// # Errors
    /// Returns an error if the track is gone, has no usable title, or has no
    /// thumbnail of any known size
    async fn fetch_track_details(&self, id: &TrackId) -> Result<TrackDetails>;
}
