//! Property-based tests for the queue engine
//!
//! Uses proptest to check selection, history and transition invariants
//! across random playlists, histories and operation sequences.

mod common;

use common::FakeCatalog;
use deck_core::TrackId;
use deck_queue::{
    select_upcoming, EngineConfig, PlayedHistory, QueueEngine, QueueState, ShuffleMode,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

// ===== Helpers =====

fn arbitrary_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z0-9]{4,11}", 1..30).prop_map(|set| set.into_iter().collect())
}

fn state_with_history(ids: &[String], played: &[usize], mode: ShuffleMode) -> QueueState {
    let mut state = QueueState::new(10);
    state.initialize(ids.iter().map(|id| TrackId::new(id.as_str())).collect(), mode);
    for &index in played {
        state.record_advance(TrackId::new(ids[index % ids.len()].as_str()));
    }
    state
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ===== Property Tests =====

proptest! {
    /// Property: the upcoming selection is unique, excludes the current id
    /// and has exactly min(count, len - 1) entries
    #[test]
    fn selection_shape(
        ids in arbitrary_ids(),
        played in prop::collection::vec(0usize..64, 0..15),
        count in 0usize..6,
    ) {
        let state = state_with_history(&ids, &played, ShuffleMode::Random);
        let selected = select_upcoming(&state, count, 5);

        prop_assert_eq!(selected.len(), count.min(ids.len() - 1));

        let unique: HashSet<_> = selected.iter().collect();
        prop_assert_eq!(unique.len(), selected.len(), "Duplicate in selection");

        let current = state.current_id().unwrap();
        prop_assert!(!selected.contains(current), "Current track selected");
        prop_assert!(selected.iter().all(|id| state.position_of(id).is_some()));
    }

    /// Property: recently played ids are skipped while enough other
    /// candidates exist
    #[test]
    fn selection_avoids_recent_when_possible(
        ids in arbitrary_ids(),
        played in prop::collection::vec(0usize..64, 0..15),
        count in 1usize..6,
    ) {
        let state = state_with_history(&ids, &played, ShuffleMode::Off);
        let recent: HashSet<TrackId> = state.played_tracks().recent(5).cloned().collect();
        let current = state.current_id().cloned().unwrap();

        let fresh = ids
            .iter()
            .map(|id| TrackId::new(id.as_str()))
            .filter(|id| *id != current && !recent.contains(id))
            .count();

        let selected = select_upcoming(&state, count, 5);
        if fresh >= count {
            prop_assert!(
                selected.iter().all(|id| !recent.contains(id)),
                "Recently played id selected with {} fresh candidates",
                fresh
            );
        }
    }

    /// Property: history never exceeds its bound and keeps the newest entries
    #[test]
    fn history_is_bounded(pushes in prop::collection::vec("[a-z]{1,4}", 0..40)) {
        let mut history = PlayedHistory::new(10);
        for id in &pushes {
            history.push(TrackId::new(id.as_str()));
        }

        prop_assert!(history.len() <= 10);

        let expected: Vec<&str> = pushes
            .iter()
            .skip(pushes.len().saturating_sub(10))
            .map(String::as_str)
            .collect();
        let actual: Vec<&str> = history.get_all().iter().map(|id| id.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: the session playlist is a deduplicated permutation of the
    /// raw ids
    #[test]
    fn initialize_keeps_every_distinct_id(
        raw in prop::collection::vec("[a-e]{1,2}", 1..40),
    ) {
        let mut state = QueueState::new(10);
        state.initialize(raw.iter().map(|id| TrackId::new(id.as_str())).collect(), ShuffleMode::Random);

        let distinct: HashSet<&str> = raw.iter().map(String::as_str).collect();
        let playlist: HashSet<&str> = state.playlist().iter().map(|id| id.as_str()).collect();

        prop_assert_eq!(state.len(), distinct.len());
        prop_assert_eq!(playlist, distinct);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: after any sequence of operations the current track is a
    /// playlist member, the upcoming list is clean and history is bounded
    #[test]
    fn engine_invariants_hold(
        size in 2usize..12,
        invalid in prop::collection::hash_set(1usize..12, 0..3),
        operations in prop::collection::vec((0u8..5, 0usize..12), 1..25),
    ) {
        let ids: Vec<String> = (0..size).map(|i| format!("t{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let invalid: Vec<&str> = invalid
            .iter()
            .filter(|&&i| i < size)
            .map(|&i| id_refs[i])
            .collect();

        let catalog = Arc::new(FakeCatalog::new(&id_refs).with_invalid(&invalid));
        let config = EngineConfig {
            shuffle: ShuffleMode::Off,
            ..EngineConfig::default()
        };

        runtime().block_on(async {
            let engine = QueueEngine::from_ids(
                catalog,
                ids.iter().map(|id| TrackId::new(id.as_str())).collect(),
                config,
            );
            // t0 is always valid, so start succeeds
            engine.start().await.unwrap();

            for (op, arg) in operations {
                // Failures surface through the error field; invariants must
                // hold either way
                match op {
                    0 => { let _ = engine.advance().await; }
                    1 => { let _ = engine.go_to_previous().await; }
                    2 => { let _ = engine.notify_playback_ended().await; }
                    3 => {
                        let _ = engine.select_track(TrackId::new(format!("t{}", arg % size))).await;
                    }
                    _ => {
                        let playlist = engine.playlist().await;
                        if playlist.len() > 1 {
                            let id = playlist[arg % playlist.len()].clone();
                            let _ = engine.notify_playback_error(&id).await;
                        }
                    }
                }
                engine.settle().await;

                let playlist = engine.playlist().await;
                let snapshot = engine.snapshot().await;

                assert!(!snapshot.is_transitioning);
                assert!(engine.played_tracks().await.len() <= 10);
                assert!(engine.current_index().await < playlist.len());

                if let Some(current) = &snapshot.current_track {
                    assert!(playlist.contains(&current.id));
                    assert!(!invalid.contains(&current.id.as_str()));
                    assert!(snapshot.upcoming_tracks.iter().all(|t| t.id != current.id));
                }

                let upcoming: HashSet<_> = snapshot.upcoming_tracks.iter().map(|t| &t.id).collect();
                assert_eq!(upcoming.len(), snapshot.upcoming_tracks.len());
                assert!(snapshot.upcoming_tracks.len() <= 3);
                assert!(snapshot.upcoming_tracks.iter().all(|t| playlist.contains(&t.id)));
            }
        });
    }
}
