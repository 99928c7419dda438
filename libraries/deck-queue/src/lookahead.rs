//! Lookahead selection
//!
//! Picks the ids to prefetch after the current track. Recently played tracks
//! are skipped while the playlist has enough other candidates; when it runs
//! short, a second pass lets them back in.

use crate::state::QueueState;
use deck_core::TrackId;
use std::collections::HashSet;

/// Default number of upcoming tracks
pub const DEFAULT_LOOKAHEAD: usize = 3;

/// Default number of recent history entries to avoid
pub const DEFAULT_AVOID_RECENT: usize = 5;

/// Select the next `count` ids to prefetch
///
/// 1. Avoid the current id and the last `avoid_recent` played ids.
/// 2. Scan forward from `current_index + 1`, wrapping, visiting each position
///    at most once.
/// 3. If short, avoid only the current id and rescan from position 0.
///
/// Returns `min(count, len - 1)` unique ids for a playlist of unique ids, and
/// never the current id. Reads the state, never mutates it.
pub fn select_upcoming(state: &QueueState, count: usize, avoid_recent: usize) -> Vec<TrackId> {
    let playlist = state.playlist();
    let len = playlist.len();
    if len == 0 || count == 0 {
        return Vec::new();
    }

    let current = state.current_id();
    let mut avoid: HashSet<&TrackId> = state.played_tracks().recent(avoid_recent).collect();
    avoid.extend(current);

    let mut selected: Vec<TrackId> = Vec::with_capacity(count);
    let mut taken: HashSet<&TrackId> = HashSet::with_capacity(count);

    let start = state.current_index() + 1;
    for offset in 0..len {
        if selected.len() == count {
            break;
        }
        let id = &playlist[(start + offset) % len];
        if !avoid.contains(id) && taken.insert(id) {
            selected.push(id.clone());
        }
    }

    if selected.len() < count {
        for id in playlist {
            if selected.len() == count {
                break;
            }
            if Some(id) != current && taken.insert(id) {
                selected.push(id.clone());
            }
        }
    }

    selected
}
