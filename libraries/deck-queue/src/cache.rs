//! Validation cache
//!
//! Memoizes catalog lookups for the session. Successful lookups are stored as
//! valid entries and served from memory afterwards. Failed lookups are only
//! remembered for diagnostics: by default a failed id is asked again the
//! next time it comes up, so a transient network blip does not poison it.
//!
//! Concurrent `validate` calls for the same id share a single provider call.
//! Removed ids stay removed: a lookup that lands after `remove` is discarded.

use deck_core::{CatalogProvider, DeckError, TrackDetails, TrackId, ValidatedTrack};
use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

type Lookup = Shared<BoxFuture<'static, Option<TrackDetails>>>;

/// Session cache of validated tracks
pub struct ValidationCache {
    provider: Arc<dyn CatalogProvider>,
    entries: RwLock<HashMap<TrackId, ValidatedTrack>>,
    failed: RwLock<HashSet<TrackId>>,
    removed: RwLock<HashSet<TrackId>>,
    in_flight: Mutex<HashMap<TrackId, Lookup>>,
    timeout: Duration,
    cache_negative_results: bool,
}

impl ValidationCache {
    /// Create an empty cache in front of `provider`
    pub fn new(provider: Arc<dyn CatalogProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
            failed: RwLock::new(HashSet::new()),
            removed: RwLock::new(HashSet::new()),
            in_flight: Mutex::new(HashMap::new()),
            timeout,
            cache_negative_results: false,
        }
    }

    /// Short-circuit ids that already failed instead of asking again
    #[must_use]
    pub fn with_negative_caching(mut self, enabled: bool) -> Self {
        self.cache_negative_results = enabled;
        self
    }

    /// Cached valid entry for `id`, without touching the provider
    pub async fn get(&self, id: &TrackId) -> Option<ValidatedTrack> {
        self.entries
            .read()
            .await
            .get(id)
            .filter(|entry| entry.is_valid)
            .cloned()
    }

    /// Cheap path first, then `validate`
    pub async fn resolve(&self, id: &TrackId) -> Option<ValidatedTrack> {
        if let Some(entry) = self.get(id).await {
            return Some(entry);
        }
        self.validate(id).await
    }

    /// Look `id` up in the catalog and store the result
    ///
    /// Never fails: every provider error is logged with the id and collapses
    /// to `None`.
    pub async fn validate(&self, id: &TrackId) -> Option<ValidatedTrack> {
        if self.removed.read().await.contains(id) {
            debug!(track_id = %id, "Skipping removed track");
            return None;
        }
        if self.cache_negative_results && self.is_known_invalid(id).await {
            debug!(track_id = %id, "Skipping known-invalid track");
            return None;
        }

        let lookup = self.lookup_for(id).await;
        let details = lookup.await;

        {
            let mut in_flight = self.in_flight.lock().await;
            if in_flight.get(id).is_some_and(|l| l.peek().is_some()) {
                in_flight.remove(id);
            }
        }

        // Same lock order as `remove`, so a removal cannot slip in between
        let mut entries = self.entries.write().await;
        if self.removed.read().await.contains(id) {
            debug!(track_id = %id, "Track removed during lookup, discarding result");
            return None;
        }
        match details {
            Some(details) => {
                let entry = ValidatedTrack::valid(id.clone(), details);
                entries.insert(id.clone(), entry.clone());
                self.failed.write().await.remove(id);
                Some(entry)
            }
            None => {
                self.failed.write().await.insert(id.clone());
                None
            }
        }
    }

    /// Validate several ids concurrently, keeping only the valid ones
    pub async fn validate_many(&self, ids: &[TrackId]) -> Vec<ValidatedTrack> {
        join_all(ids.iter().map(|id| self.resolve(id)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Whether the last lookup for `id` failed
    pub async fn is_known_invalid(&self, id: &TrackId) -> bool {
        self.failed.read().await.contains(id)
    }

    /// Forget `id` for the rest of the session
    ///
    /// Later lookups, including ones already in flight, resolve to `None`.
    pub async fn remove(&self, id: &TrackId) {
        let mut entries = self.entries.write().await;
        self.removed.write().await.insert(id.clone());
        entries.remove(id);
        self.failed.write().await.remove(id);
    }

    /// Number of valid entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Join the pending lookup for `id` or start a new one
    async fn lookup_for(&self, id: &TrackId) -> Lookup {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(pending) = in_flight.get(id) {
            if pending.peek().is_none() {
                debug!(track_id = %id, "Joining in-flight validation");
                return pending.clone();
            }
        }

        let lookup = fetch_details(Arc::clone(&self.provider), id.clone(), self.timeout)
            .boxed()
            .shared();
        in_flight.insert(id.clone(), lookup.clone());
        lookup
    }
}

async fn fetch_details(
    provider: Arc<dyn CatalogProvider>,
    id: TrackId,
    timeout: Duration,
) -> Option<TrackDetails> {
    let result = match tokio::time::timeout(timeout, provider.fetch_track_details(&id)).await {
        Ok(result) => result,
        Err(_) => Err(DeckError::Timeout(timeout)),
    };

    match result {
        Ok(details) if details.cover_image_url.is_empty() => {
            warn!(track_id = %id, "Track has no usable thumbnail");
            None
        }
        Ok(details) => {
            debug!(track_id = %id, title = %details.title, "Track validated");
            Some(details)
        }
        Err(DeckError::MissingThumbnail(_)) => {
            warn!(track_id = %id, "Track has no usable thumbnail");
            None
        }
        Err(e) if e.is_content_failure() => {
            warn!(track_id = %id, error = %e, "Track failed validation");
            None
        }
        Err(e) => {
            warn!(track_id = %id, error = %e, "Track lookup failed");
            None
        }
    }
}
