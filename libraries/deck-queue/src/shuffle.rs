//! Shuffle for the session playlist
//!
//! The playlist is shuffled once, when it is loaded. Order must not be
//! predictable across sessions, so the random mode is a plain Fisher-Yates
//! permutation seeded from the thread RNG.

use crate::types::ShuffleMode;
use deck_core::TrackId;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Shuffle a playlist in place
pub fn shuffle_playlist(ids: &mut [TrackId], mode: ShuffleMode) {
    match mode {
        ShuffleMode::Off => {}
        ShuffleMode::Random => {
            let mut rng = thread_rng();
            ids.shuffle(&mut rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn playlist(n: usize) -> Vec<TrackId> {
        (0..n).map(|i| TrackId::new(format!("t{i}"))).collect()
    }

    #[test]
    fn shuffle_mode_off_no_change() {
        let mut ids = playlist(5);
        let original = ids.clone();

        shuffle_playlist(&mut ids, ShuffleMode::Off);
        assert_eq!(ids, original);
    }

    #[test]
    fn random_shuffle_is_a_permutation() {
        let mut ids = playlist(50);
        let original: HashSet<TrackId> = ids.iter().cloned().collect();

        shuffle_playlist(&mut ids, ShuffleMode::Random);

        assert_eq!(ids.len(), 50);
        let shuffled: HashSet<TrackId> = ids.iter().cloned().collect();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn random_shuffle_changes_order() {
        // 50! orderings: keeping the original order 20 times in a row means
        // the shuffle is not running
        let original = playlist(50);
        let changed = (0..20).any(|_| {
            let mut ids = original.clone();
            shuffle_playlist(&mut ids, ShuffleMode::Random);
            ids != original
        });
        assert!(changed);
    }

    #[test]
    fn first_position_is_spread_out() {
        let original = playlist(4);
        let mut firsts = HashSet::new();
        for _ in 0..200 {
            let mut ids = original.clone();
            shuffle_playlist(&mut ids, ShuffleMode::Random);
            firsts.insert(ids[0].clone());
        }
        assert_eq!(firsts.len(), 4, "every track should be able to start");
    }
}
