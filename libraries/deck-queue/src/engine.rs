//! Queue engine - transition orchestration
//!
//! Coordinates queue state, validation cache, lookahead and events. Every way
//! of changing the current track (next, previous, explicit selection,
//! playback ending, error recovery) funnels into [`QueueEngine::transition_to`],
//! which is single-flight: while one transition is in flight, further
//! requests are dropped rather than queued.
//!
//! A transition commits the new current track and leaves the in-flight state
//! before the upcoming list is refreshed; the refresh runs as a background
//! task so the rendering layer is never blocked on prefetching.

use crate::{
    cache::ValidationCache,
    error::{QueueError, Result, LOAD_FAILED_MESSAGE, VALIDATION_FAILED_MESSAGE},
    events::{EngineEvent, EventBus},
    lookahead::select_upcoming,
    state::QueueState,
    types::{EngineConfig, QueueSnapshot, Transition, TransitionKind},
};
use deck_core::{CatalogProvider, DeckError, Track, TrackId, ValidatedTrack};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Playback queue engine
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct QueueEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    cache: ValidationCache,
    state: RwLock<QueueState>,
    gate: TransitionGate,
    events: EventBus,
    lookahead: Mutex<Option<JoinHandle<()>>>,
    config: EngineConfig,
}

impl QueueEngine {
    /// Build a session from a catalog playlist and bring up the first track
    ///
    /// Fetch and configuration failures are fatal: the engine is not created.
    pub async fn initialize(
        provider: Arc<dyn CatalogProvider>,
        playlist_id: &str,
        config: EngineConfig,
    ) -> Result<Self> {
        info!(playlist_id = %playlist_id, "Loading playlist");
        let ids = provider.fetch_playlist_items(playlist_id).await?;
        if ids.is_empty() {
            return Err(DeckError::EmptyPlaylist(playlist_id.to_string()).into());
        }

        let engine = Self::from_ids(provider, ids, config);
        engine.start().await?;
        Ok(engine)
    }

    /// Create a cold session over `raw_ids`
    ///
    /// The ids are deduplicated and shuffled per `config.shuffle`; nothing is
    /// validated until [`start`](Self::start) or the first transition.
    pub fn from_ids(
        provider: Arc<dyn CatalogProvider>,
        raw_ids: Vec<TrackId>,
        config: EngineConfig,
    ) -> Self {
        let mut state = QueueState::new(config.history_size);
        state.initialize(raw_ids, config.shuffle);
        debug!(tracks = state.len(), shuffle = ?config.shuffle, "Queue initialized");

        let cache = ValidationCache::new(provider, config.validation_timeout())
            .with_negative_caching(config.cache_negative_results);

        Self {
            inner: Arc::new(EngineInner {
                cache,
                state: RwLock::new(state),
                gate: TransitionGate::new(config.transition_watchdog()),
                events: EventBus::new(config.event_capacity),
                lookahead: Mutex::new(None),
                config,
            }),
        }
    }

    /// Prime the first validations and make the first track current
    ///
    /// Validates the current id plus the first lookahead picks concurrently
    /// (`initial_prefetch` ids in total), then transitions to the current
    /// position, retrying forward if it turned out invalid. Returns once the
    /// first upcoming list is in place.
    pub async fn start(&self) -> Result<Transition> {
        let (first, prime) = {
            let state = self.inner.state.read().await;
            let first = state.current_id().cloned().ok_or(QueueError::QueueEmpty)?;
            let mut prime = vec![first.clone()];
            prime.extend(select_upcoming(
                &state,
                self.inner.config.initial_prefetch.saturating_sub(1),
                self.inner.config.avoid_recent,
            ));
            (first, prime)
        };

        let primed = self.inner.cache.validate_many(&prime).await;
        info!(
            requested = prime.len(),
            valid = primed.len(),
            "Primed initial validations"
        );

        let transition = self.transition_to(first, TransitionKind::Initial).await?;
        self.settle().await;
        Ok(transition)
    }

    /// Move the current track to `target`
    ///
    /// Dropped (not queued) when another transition is in flight. An invalid
    /// target is retried forward through the playlist up to `max_retries`
    /// hops; exhausting them sets the "Track validation failed" error.
    ///
    /// A transition whose gate was force-cleared by the watchdog no longer
    /// owns the queue: it returns `Dropped` without touching state, even if
    /// its lookup eventually succeeds.
    pub async fn transition_to(&self, target: TrackId, kind: TransitionKind) -> Result<Transition> {
        let Some(guard) = self.inner.gate.try_enter(&self.inner.events) else {
            debug!(track_id = %target, ?kind, "Transition in flight, dropping request");
            return Ok(Transition::Dropped);
        };

        let max_attempts = self.inner.config.max_retries + 1;
        let mut candidate = target;
        let mut attempts = 0;

        loop {
            let position = self.inner.state.read().await.position_of(&candidate);
            let Some(index) = position else {
                warn!(track_id = %candidate, ?kind, "Transition target not in playlist");
                return self
                    .give_up(
                        guard,
                        LOAD_FAILED_MESSAGE,
                        QueueError::TrackNotInPlaylist(candidate),
                    )
                    .await;
            };

            attempts += 1;
            if let Some(validated) = self.inner.cache.resolve(&candidate).await {
                let track = Track::from(&validated);
                let previous_track_id = {
                    let mut state = self.inner.state.write().await;
                    if !guard.is_current() {
                        warn!(
                            track_id = %candidate,
                            ?kind,
                            "Transition superseded by the watchdog, discarding"
                        );
                        return Ok(Transition::Dropped);
                    }
                    let Some(index) = state.position_of(&candidate) else {
                        drop(state);
                        warn!(track_id = %candidate, "Track purged while validating");
                        return self
                            .give_up(
                                guard,
                                LOAD_FAILED_MESSAGE,
                                QueueError::TrackNotInPlaylist(candidate),
                            )
                            .await;
                    };
                    let previous = state.current_track().map(|t| t.id.clone());
                    if let Some(from) = previous.as_ref().filter(|from| **from != candidate) {
                        state.record_advance(from.clone());
                    }
                    state.set_current(index, track.clone());
                    state.clear_error();
                    previous
                };

                drop(guard);

                info!(
                    track_id = %track.id,
                    title = %track.title,
                    ?kind,
                    attempts,
                    "Now playing"
                );
                self.inner.events.emit(EngineEvent::TrackChanged {
                    track: track.clone(),
                    previous_track_id,
                    auto_advance: kind.is_auto_advance(),
                });

                self.spawn_lookahead().await;
                return Ok(Transition::Completed(track));
            }

            if !guard.is_current() {
                warn!(
                    failed = %candidate,
                    ?kind,
                    "Transition superseded by the watchdog, not retrying"
                );
                return Ok(Transition::Dropped);
            }

            let next = self
                .inner
                .state
                .read()
                .await
                .id_at_wrapped(index + 1)
                .cloned();
            match next {
                Some(next) if attempts < max_attempts && next != candidate => {
                    debug!(
                        failed = %candidate,
                        next = %next,
                        attempt = attempts,
                        "Track invalid, trying the next one"
                    );
                    candidate = next;
                }
                _ => {
                    error!(attempts, ?kind, "No playable track found, giving up");
                    return self
                        .give_up(
                            guard,
                            VALIDATION_FAILED_MESSAGE,
                            QueueError::ValidationExhausted { attempts },
                        )
                        .await;
                }
            }
        }
    }

    /// Manual "next": one step forward, wrapping at the end
    pub async fn advance(&self) -> Result<Transition> {
        let target = self.neighbour(QueueState::next_id).await?;
        self.transition_to(target, TransitionKind::Next).await
    }

    /// Manual "previous": one step back, wrapping at the start
    ///
    /// This is a circular step, not a history rewind.
    pub async fn go_to_previous(&self) -> Result<Transition> {
        let target = self.neighbour(QueueState::previous_id).await?;
        self.transition_to(target, TransitionKind::Previous).await
    }

    /// Jump straight to `id`
    pub async fn select_track(&self, id: TrackId) -> Result<Transition> {
        self.transition_to(id, TransitionKind::Select).await
    }

    /// Playback of the current track reached its end
    pub async fn notify_playback_ended(&self) -> Result<Transition> {
        let target = self.neighbour(QueueState::next_id).await?;
        self.transition_to(target, TransitionKind::AutoAdvance).await
    }

    /// The player could not play `id` at all
    ///
    /// The track is purged from the session. If it was the current track,
    /// the engine moves on to whichever track now sits at its position.
    pub async fn notify_playback_error(&self, id: &TrackId) -> Result<Option<Transition>> {
        let Some(purged) = self.purge(id).await else {
            return Ok(None);
        };
        if !purged.was_current {
            return Ok(None);
        }

        let target = {
            let state = self.inner.state.read().await;
            state.id_at_wrapped(purged.position).cloned()
        };
        match target {
            Some(target) => self
                .transition_to(target, TransitionKind::Recovery)
                .await
                .map(Some),
            None => {
                self.fail(LOAD_FAILED_MESSAGE).await;
                Err(QueueError::QueueEmpty)
            }
        }
    }

    /// Remove a permanently unplayable track from the session
    ///
    /// Returns whether the id was part of the playlist.
    pub async fn purge_track(&self, id: &TrackId) -> bool {
        self.purge(id).await.is_some()
    }

    /// Recompute and revalidate the upcoming list
    ///
    /// Runs in the background after every transition; callable directly to
    /// refresh on demand. Validation failures shorten the list rather than
    /// failing the refresh.
    pub async fn refresh_upcoming(&self) -> Vec<Track> {
        let ids = {
            let state = self.inner.state.read().await;
            select_upcoming(
                &state,
                self.inner.config.lookahead_count,
                self.inner.config.avoid_recent,
            )
        };

        let validated: HashMap<TrackId, ValidatedTrack> = self
            .inner
            .cache
            .validate_many(&ids)
            .await
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect();

        let tracks: Vec<Track> = ids
            .iter()
            .filter_map(|id| validated.get(id))
            .map(Track::from)
            .collect();
        if tracks.len() < ids.len() {
            warn!(
                requested = ids.len(),
                valid = tracks.len(),
                "Some upcoming tracks failed validation"
            );
        }

        let upcoming = {
            let mut state = self.inner.state.write().await;
            state.set_upcoming(tracks);
            state.upcoming_tracks().to_vec()
        };
        debug!(count = upcoming.len(), "Upcoming tracks refreshed");
        self.inner.events.emit(EngineEvent::UpcomingChanged {
            tracks: upcoming.clone(),
        });
        upcoming
    }

    /// Wait for the most recently spawned lookahead refresh
    ///
    /// Earlier refreshes that were superseded are not awaited.
    pub async fn settle(&self) {
        let handle = self.inner.lookahead.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Lookahead refresh task failed");
            }
        }
    }

    /// Read-only view for the rendering layer
    pub async fn snapshot(&self) -> QueueSnapshot {
        let is_transitioning = self.inner.gate.is_active();
        self.inner.state.read().await.snapshot(is_transitioning)
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.inner.events.subscribe()
    }

    /// Dismiss the current error banner
    pub async fn clear_error(&self) {
        self.inner.state.write().await.clear_error();
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.gate.is_active()
    }

    /// Session playlist, in playback order
    pub async fn playlist(&self) -> Vec<TrackId> {
        self.inner.state.read().await.playlist().to_vec()
    }

    pub async fn current_index(&self) -> usize {
        self.inner.state.read().await.current_index()
    }

    /// Played history, oldest first
    pub async fn played_tracks(&self) -> Vec<TrackId> {
        self.inner
            .state
            .read()
            .await
            .played_tracks()
            .get_all()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn cache(&self) -> &ValidationCache {
        &self.inner.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    async fn neighbour(&self, step: fn(&QueueState) -> Option<&TrackId>) -> Result<TrackId> {
        let state = self.inner.state.read().await;
        step(&state).cloned().ok_or(QueueError::QueueEmpty)
    }

    async fn purge(&self, id: &TrackId) -> Option<crate::state::Purged> {
        let purged = self.inner.state.write().await.purge_track(id)?;
        self.inner.cache.remove(id).await;
        warn!(track_id = %id, position = purged.position, "Track purged from playlist");
        self.inner.events.emit(EngineEvent::TrackPurged {
            track_id: id.clone(),
        });
        Some(purged)
    }

    /// Set the error banner for a failed transition, then release the gate
    ///
    /// The banner is written while the gate is still held so a later
    /// successful transition always clears it.
    async fn give_up(
        &self,
        guard: GateGuard<'_>,
        message: &str,
        err: QueueError,
    ) -> Result<Transition> {
        {
            let mut state = self.inner.state.write().await;
            if !guard.is_current() {
                debug!(error = %err, "Superseded transition failed, leaving the banner alone");
                return Ok(Transition::Dropped);
            }
            state.set_error(message);
        }
        self.inner.events.emit(EngineEvent::Error {
            message: message.to_string(),
        });
        drop(guard);
        Err(err)
    }

    async fn fail(&self, message: &str) {
        self.inner.state.write().await.set_error(message);
        self.inner.events.emit(EngineEvent::Error {
            message: message.to_string(),
        });
    }

    async fn spawn_lookahead(&self) {
        let engine = self.clone();
        let handle = tokio::spawn(async move {
            engine.refresh_upcoming().await;
        });
        *self.inner.lookahead.lock().await = Some(handle);
    }
}

/// Single-flight gate for transitions
///
/// The holder is identified by a ticket so a guard released after the
/// watchdog already handed the gate to someone else does not clear it.
struct TransitionGate {
    holder: StdMutex<Option<Holder>>,
    next_ticket: AtomicU64,
    watchdog: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Holder {
    ticket: u64,
    since: Instant,
}

impl TransitionGate {
    fn new(watchdog: Duration) -> Self {
        Self {
            holder: StdMutex::new(None),
            next_ticket: AtomicU64::new(1),
            watchdog,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Holder>> {
        self.holder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_enter<'a>(&'a self, events: &'a EventBus) -> Option<GateGuard<'a>> {
        let now = Instant::now();
        let mut slot = self.slot();

        if let Some(holder) = *slot {
            let elapsed = now.saturating_duration_since(holder.since);
            if elapsed < self.watchdog {
                return None;
            }
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                "Transition flag stuck, forcing it clear"
            );
        }

        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        *slot = Some(Holder { ticket, since: now });
        drop(slot);

        events.emit(EngineEvent::LoadingChanged { is_loading: true });
        Some(GateGuard {
            gate: self,
            events,
            ticket,
        })
    }

    fn is_active(&self) -> bool {
        self.slot().is_some()
    }
}

struct GateGuard<'a> {
    gate: &'a TransitionGate,
    events: &'a EventBus,
    ticket: u64,
}

impl GateGuard<'_> {
    /// Whether this guard still holds the gate (the watchdog did not hand it on)
    fn is_current(&self) -> bool {
        self.gate
            .slot()
            .is_some_and(|holder| holder.ticket == self.ticket)
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.gate.slot();
        if slot.is_some_and(|holder| holder.ticket == self.ticket) {
            *slot = None;
            drop(slot);
            self.events
                .emit(EngineEvent::LoadingChanged { is_loading: false });
        }
    }
}
