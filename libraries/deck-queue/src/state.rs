//! Queue state
//!
//! The session playlist plus everything derived from walking it: current
//! position, played history, materialized upcoming list and the persistent
//! error banner.
//!
//! ```text
//! playlist:  [ E  B  A  D  C ]      (shuffled once, fixed length)
//!                  ^
//!                  current_index = 1, current_track = B
//! upcoming:  [ A  D  C ]            (validated, never contains B)
//! played:    [ E ]                  (bounded, oldest evicted first)
//! ```
//!
//! Only the queue engine mutates this; consumers see snapshots.

use crate::history::PlayedHistory;
use crate::shuffle::shuffle_playlist;
use crate::types::{QueueSnapshot, ShuffleMode};
use deck_core::{Track, TrackId};
use std::collections::HashSet;

/// Where a purged track sat before removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Purged {
    /// Former index of the removed id
    pub position: usize,

    /// The removed id was the current track
    pub was_current: bool,
}

/// Ordered playlist, position and history for one session
#[derive(Debug, Clone)]
pub struct QueueState {
    playlist: Vec<TrackId>,
    current_index: usize,
    current_track: Option<Track>,
    upcoming_tracks: Vec<Track>,
    played: PlayedHistory,
    error: Option<String>,
}

impl QueueState {
    /// Create an empty state with the given history bound
    pub fn new(history_size: usize) -> Self {
        Self {
            playlist: Vec::new(),
            current_index: 0,
            current_track: None,
            upcoming_tracks: Vec::new(),
            played: PlayedHistory::new(history_size),
            error: None,
        }
    }

    /// Load a raw id list as the session playlist
    ///
    /// Repeated ids keep their first occurrence, then the list is shuffled.
    /// Position, history, upcoming list and error are reset.
    pub fn initialize(&mut self, raw_ids: Vec<TrackId>, mode: ShuffleMode) {
        let mut seen = HashSet::with_capacity(raw_ids.len());
        let mut ids: Vec<TrackId> = raw_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        shuffle_playlist(&mut ids, mode);

        self.playlist = ids;
        self.current_index = 0;
        self.current_track = None;
        self.upcoming_tracks.clear();
        self.played.clear();
        self.error = None;
    }

    pub fn playlist(&self) -> &[TrackId] {
        &self.playlist
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Id the queue is positioned on
    ///
    /// The current track's id once one is set, otherwise the id at the
    /// current index (before the first transition completes).
    pub fn current_id(&self) -> Option<&TrackId> {
        self.current_track
            .as_ref()
            .map(|track| &track.id)
            .or_else(|| self.playlist.get(self.current_index))
    }

    pub fn upcoming_tracks(&self) -> &[Track] {
        &self.upcoming_tracks
    }

    pub fn played_tracks(&self) -> &PlayedHistory {
        &self.played
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Index of `id` in the playlist
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.playlist.iter().position(|t| t == id)
    }

    /// Id at `index`, wrapping around the playlist
    pub fn id_at_wrapped(&self, index: usize) -> Option<&TrackId> {
        if self.playlist.is_empty() {
            return None;
        }
        self.playlist.get(index % self.playlist.len())
    }

    /// Id one step forward from the current index (circular)
    pub fn next_id(&self) -> Option<&TrackId> {
        self.id_at_wrapped(self.current_index + 1)
    }

    /// Id one step back from the current index (circular)
    pub fn previous_id(&self) -> Option<&TrackId> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        self.playlist.get((self.current_index + len - 1) % len)
    }

    /// Record the track being moved away from
    pub fn record_advance(&mut self, from_id: TrackId) {
        self.played.push(from_id);
    }

    /// Point the queue at `index` and its validated track
    pub(crate) fn set_current(&mut self, index: usize, track: Track) {
        debug_assert_eq!(self.playlist.get(index), Some(&track.id));
        self.current_index = index;
        self.upcoming_tracks.retain(|t| t.id != track.id);
        self.current_track = Some(track);
    }

    /// Replace the upcoming list
    ///
    /// Results from a lookahead refresh may land after a newer transition, so
    /// the current track, repeats and ids no longer in the playlist are
    /// dropped on the way in.
    pub(crate) fn set_upcoming(&mut self, tracks: Vec<Track>) {
        let current = self.current_id().cloned();
        let mut seen = HashSet::new();
        self.upcoming_tracks = tracks
            .into_iter()
            .filter(|t| Some(&t.id) != current.as_ref())
            .filter(|t| self.playlist.contains(&t.id))
            .filter(|t| seen.insert(t.id.clone()))
            .collect();
    }

    /// Remove a permanently unplayable track
    ///
    /// Keeps `current_index` on the same logical track when the removed id
    /// sat before it, then clamps the index into bounds. Returns `None` if
    /// the id was not in the playlist.
    pub fn purge_track(&mut self, id: &TrackId) -> Option<Purged> {
        let position = self.position_of(id)?;
        self.playlist.remove(position);
        self.upcoming_tracks.retain(|t| &t.id != id);

        if position < self.current_index {
            self.current_index -= 1;
        }
        self.current_index = self
            .current_index
            .min(self.playlist.len().saturating_sub(1));

        let was_current = self
            .current_track
            .as_ref()
            .is_some_and(|track| &track.id == id);
        if was_current {
            self.current_track = None;
        }

        Some(Purged {
            position,
            was_current,
        })
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub(crate) fn clear_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    /// Read-only view; transition flags are owned by the engine
    pub(crate) fn snapshot(&self, is_transitioning: bool) -> QueueSnapshot {
        QueueSnapshot {
            current_track: self.current_track.clone(),
            upcoming_tracks: self.upcoming_tracks.clone(),
            is_loading_next: is_transitioning,
            is_transitioning,
            error: self.error.clone(),
        }
    }
}

impl Default for QueueState {
    fn default() -> Self {
        Self::new(10)
    }
}
