//! Played-track history
//!
//! Bounded record of the tracks transitions moved away from. It feeds the
//! lookahead's avoidance pool only; "previous" never pops from it.

use deck_core::TrackId;
use std::collections::VecDeque;

/// Played history with bounded size
///
/// Ring buffer that automatically discards the oldest entries.
#[derive(Debug, Clone)]
pub struct PlayedHistory {
    /// History buffer (most recent = back)
    tracks: VecDeque<TrackId>,

    /// Maximum history size
    max_size: usize,
}

impl PlayedHistory {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a track id
    ///
    /// If history is full, oldest entry is discarded
    pub fn push(&mut self, id: TrackId) {
        if self.max_size == 0 {
            return;
        }
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_front();
        }
        self.tracks.push_back(id);
    }

    /// The `n` most recent entries, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &TrackId> {
        self.tracks.iter().skip(self.tracks.len().saturating_sub(n))
    }

    /// Get all entries (oldest first)
    pub fn get_all(&self) -> Vec<&TrackId> {
        self.tracks.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

impl Default for PlayedHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(history: &PlayedHistory) -> Vec<&str> {
        history.get_all().into_iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn push_keeps_order() {
        let mut history = PlayedHistory::new(10);
        history.push(TrackId::new("a"));
        history.push(TrackId::new("b"));

        assert_eq!(history.len(), 2);
        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn history_bounded() {
        let mut history = PlayedHistory::new(3);
        for id in ["1", "2", "3", "4"] {
            history.push(TrackId::new(id));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(ids(&history), vec!["2", "3", "4"]);
    }

    #[test]
    fn recent_takes_from_the_back() {
        let mut history = PlayedHistory::new(10);
        for i in 1..=8 {
            history.push(TrackId::new(i.to_string()));
        }

        let recent: Vec<&str> = history.recent(5).map(|id| id.as_str()).collect();
        assert_eq!(recent, vec!["4", "5", "6", "7", "8"]);

        // Asking for more than is stored returns everything
        assert_eq!(history.recent(50).count(), 8);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = PlayedHistory::new(0);
        history.push(TrackId::new("a"));
        assert!(history.is_empty());
    }

    #[test]
    fn default_history() {
        let mut history = PlayedHistory::default();
        for i in 0..12 {
            history.push(TrackId::new(format!("t{i}")));
        }
        assert_eq!(history.len(), 10);
    }
}
