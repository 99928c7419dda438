//! Core types for queue management

use crate::lookahead::{DEFAULT_AVOID_RECENT, DEFAULT_LOOKAHEAD};
use deck_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shuffle mode applied once when the playlist is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// Keep catalog order
    Off,

    /// Uniform random permutation (Fisher-Yates)
    Random,
}

/// What asked for a transition
///
/// Every entry point funnels into the same transition routine; the kind only
/// affects logging and the emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// First track of the session
    Initial,

    /// Manual "next"
    Next,

    /// Manual "previous"
    Previous,

    /// Explicit track selection
    Select,

    /// Playback of the current track ended
    AutoAdvance,

    /// Current track was purged after a playback error
    Recovery,
}

impl TransitionKind {
    /// Whether the transition was triggered by playback ending
    pub fn is_auto_advance(self) -> bool {
        matches!(self, Self::AutoAdvance)
    }
}

/// Outcome of a transition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Current track changed
    Completed(Track),

    /// Another transition was in flight, request dropped
    Dropped,
}

impl Transition {
    /// The new current track, if the transition went through
    pub fn track(&self) -> Option<&Track> {
        match self {
            Self::Completed(track) => Some(track),
            Self::Dropped => None,
        }
    }

    /// Whether the request was dropped due to contention
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped)
    }
}

/// Read-only view of the queue for the rendering layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Track currently playing
    pub current_track: Option<Track>,

    /// Validated tracks coming up, in playback order
    pub upcoming_tracks: Vec<Track>,

    /// Mirrors `is_transitioning` for loading indicators
    pub is_loading_next: bool,

    /// A transition is in flight
    pub is_transitioning: bool,

    /// Persistent user-facing error, if any
    pub error: Option<String>,
}

/// Configuration for the queue engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum played-history size (default: 10)
    pub history_size: usize,

    /// How many recent history entries the lookahead avoids (default: 5)
    pub avoid_recent: usize,

    /// Number of upcoming tracks to prefetch (default: 3)
    pub lookahead_count: usize,

    /// Ids validated eagerly at startup, current track included (default: 4)
    pub initial_prefetch: usize,

    /// Forward retry hops after a failed validation (default: 3)
    pub max_retries: usize,

    /// After this long an in-flight transition is considered stuck (default: 15s)
    pub transition_watchdog_ms: u64,

    /// Upper bound for a single provider lookup (default: 10s)
    pub validation_timeout_ms: u64,

    /// Shuffle applied at initialization (default: Random)
    pub shuffle: ShuffleMode,

    /// Short-circuit ids that already failed validation (default: false)
    pub cache_negative_results: bool,

    /// Buffered events per subscriber (default: 64)
    pub event_capacity: usize,
}

impl EngineConfig {
    /// Watchdog threshold as a `Duration`
    pub fn transition_watchdog(&self) -> Duration {
        Duration::from_millis(self.transition_watchdog_ms)
    }

    /// Provider timeout as a `Duration`
    pub fn validation_timeout(&self) -> Duration {
        Duration::from_millis(self.validation_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_size: 10,
            avoid_recent: DEFAULT_AVOID_RECENT,
            lookahead_count: DEFAULT_LOOKAHEAD,
            initial_prefetch: 4,
            max_retries: 3,
            transition_watchdog_ms: 15_000,
            validation_timeout_ms: 10_000,
            shuffle: ShuffleMode::Random,
            cache_negative_results: false,
            event_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.history_size, 10);
        assert_eq!(config.avoid_recent, 5);
        assert_eq!(config.lookahead_count, 3);
        assert_eq!(config.initial_prefetch, 4);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.shuffle, ShuffleMode::Random);
        assert!(!config.cache_negative_results);
        assert_eq!(config.transition_watchdog(), Duration::from_secs(15));
    }

    #[test]
    fn only_auto_advance_is_auto() {
        assert!(TransitionKind::AutoAdvance.is_auto_advance());
        assert!(!TransitionKind::Next.is_auto_advance());
        assert!(!TransitionKind::Select.is_auto_advance());
    }
}
