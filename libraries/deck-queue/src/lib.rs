//! Deck Player - Playback Queue Engine
//!
//! Platform-agnostic queue engine for a player that streams a shuffled
//! external catalog.
//!
//! This crate provides:
//! - Session playlist (shuffled once, deduplicated)
//! - Validation cache (memoized catalog lookups, shared in-flight requests)
//! - Lookahead selection (avoids recently played tracks, wraps around)
//! - Single-flight transitions with bounded forward retry on invalid tracks
//! - Played history (bounded, feeds the lookahead's avoidance pool)
//! - Event stream for the rendering layer and error display
//!
//! # Architecture
//!
//! `deck-queue` knows nothing about HTTP or rendering:
//! - Catalog access goes through the `CatalogProvider` trait from `deck-core`
//! - Consumers read `QueueSnapshot`s and subscribe to `EngineEvent`s
//! - All mutation goes through `QueueEngine` entry points
//!
//! # Example
//!
//! ```rust,no_run
//! use deck_queue::{EngineConfig, QueueEngine};
//! # use deck_core::CatalogProvider;
//! # use std::sync::Arc;
//! # async fn run(provider: Arc<dyn CatalogProvider>) -> deck_queue::Result<()> {
//! let engine = QueueEngine::initialize(provider, "PL123", EngineConfig::default()).await?;
//!
//! let snapshot = engine.snapshot().await;
//! println!("Now playing: {:?}", snapshot.current_track);
//!
//! // Control playback
//! engine.advance().await?;
//! engine.go_to_previous().await?;
//! engine.notify_playback_ended().await?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod engine;
mod error;
mod events;
mod history;
mod lookahead;
mod shuffle;
mod state;
pub mod types;

// Public exports
pub use cache::ValidationCache;
pub use engine::QueueEngine;
pub use error::{QueueError, Result, LOAD_FAILED_MESSAGE, VALIDATION_FAILED_MESSAGE};
pub use events::EngineEvent;
pub use history::PlayedHistory;
pub use lookahead::{select_upcoming, DEFAULT_AVOID_RECENT, DEFAULT_LOOKAHEAD};
pub use shuffle::shuffle_playlist;
pub use state::{Purged, QueueState};
pub use types::{EngineConfig, QueueSnapshot, ShuffleMode, Transition, TransitionKind};
