//! Queue Events
//!
//! Event-based communication for the rendering layer and the error display.
//! Events are emitted at key points:
//! - Loading state changes (transition entered / left)
//! - Track changes (as soon as the transition commits)
//! - Upcoming list refreshes (after the background lookahead lands)
//! - Unrecoverable errors

use deck_core::{Track, TrackId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Events emitted by the queue engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A transition started or finished
    LoadingChanged {
        /// Whether a transition is now in flight
        is_loading: bool,
    },

    /// Current track changed
    TrackChanged {
        /// The new current track
        track: Track,
        /// ID of the track transitioned away from (if any)
        previous_track_id: Option<TrackId>,
        /// Triggered by playback ending rather than the user
        auto_advance: bool,
    },

    /// Upcoming list replaced
    UpcomingChanged {
        /// New upcoming tracks, in playback order
        tracks: Vec<Track>,
    },

    /// Track removed from the session playlist
    TrackPurged {
        /// ID of the removed track
        track_id: TrackId,
    },

    /// User-facing error
    Error {
        /// Error message
        message: String,
    },
}

/// Fan-out of engine events to any number of subscribers
///
/// Sending never blocks and never fails the engine: with no subscribers the
/// event is simply dropped, and slow subscribers observe a lag.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: EngineEvent) {
        if self.sender.send(event).is_err() {
            trace!("No event subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
