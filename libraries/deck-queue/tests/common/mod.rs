//! Shared test helpers: an in-memory catalog with switchable failures.

#![allow(dead_code)]

use async_trait::async_trait;
use deck_core::{CatalogProvider, DeckError, TrackDetails, TrackId};
use deck_queue::{EngineConfig, QueueEngine, ShuffleMode};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory catalog
///
/// Every id resolves unless marked invalid. Lookups are counted per id.
#[derive(Default)]
pub struct FakeCatalog {
    playlist: Vec<TrackId>,
    invalid: Mutex<HashSet<TrackId>>,
    calls: Mutex<HashMap<TrackId, usize>>,
    delay: Duration,
}

impl FakeCatalog {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            playlist: ids.iter().map(|id| TrackId::new(*id)).collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_invalid(self, ids: &[&str]) -> Self {
        for id in ids {
            self.set_invalid(id, true);
        }
        self
    }

    pub fn set_invalid(&self, id: &str, invalid: bool) {
        let mut set = self.invalid.lock().unwrap();
        if invalid {
            set.insert(TrackId::new(id));
        } else {
            set.remove(&TrackId::new(id));
        }
    }

    pub fn calls_for(&self, id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&TrackId::new(id))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    async fn fetch_playlist_items(&self, playlist_id: &str) -> deck_core::Result<Vec<TrackId>> {
        if playlist_id == "missing" {
            return Err(DeckError::PlaylistNotFound(playlist_id.to_string()));
        }
        Ok(self.playlist.clone())
    }

    async fn fetch_track_details(&self, id: &TrackId) -> deck_core::Result<TrackDetails> {
        *self.calls.lock().unwrap().entry(id.clone()).or_insert(0) += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.invalid.lock().unwrap().contains(id) {
            return Err(DeckError::MissingThumbnail(id.clone()));
        }
        Ok(TrackDetails::new(
            "Test Artist",
            format!("Track {id}"),
            format!("https://img.example/{id}.jpg"),
        ))
    }
}

/// Config with catalog order kept, so tests can reason about positions
pub fn ordered_config() -> EngineConfig {
    EngineConfig {
        shuffle: ShuffleMode::Off,
        ..EngineConfig::default()
    }
}

/// Started engine over `ids` in catalog order
pub async fn started_engine(catalog: Arc<FakeCatalog>, ids: &[&str]) -> QueueEngine {
    let engine = cold_engine(catalog, ids);
    engine.start().await.unwrap();
    engine
}

/// Engine over `ids` with nothing validated yet
pub fn cold_engine(catalog: Arc<FakeCatalog>, ids: &[&str]) -> QueueEngine {
    QueueEngine::from_ids(
        catalog,
        ids.iter().map(|id| TrackId::new(*id)).collect(),
        ordered_config(),
    )
}

pub fn names(ids: &[TrackId]) -> Vec<&str> {
    ids.iter().map(|id| id.as_str()).collect()
}

pub async fn current_id(engine: &QueueEngine) -> Option<String> {
    engine
        .snapshot()
        .await
        .current_track
        .map(|t| t.id.as_str().to_string())
}
