//! # Playback Session State Machine
//!
//! The finite-state machine owning the active track, position, volume, and
//! error state. All state changes funnel through one transition function so
//! the Playing entry/exit edges pair exactly with telemetry interval
//! open/close — including destructive transitions (track switch mid-play,
//! error, teardown).
//!
//! ## Generation guard
//!
//! Every track-change request bumps a monotonically increasing generation
//! counter. Async settlements (load and play outcomes) carry the generation
//! captured when the request was issued; on arrival the session compares it
//! against the current generation and discards stale settlements silently.
//! This is the stale-async-response guard that keeps rapid track switching
//! from corrupting session state.

use crate::events::SessionEvent;
use crate::state::{PlaybackState, PlayerSnapshot, Track, VolumeState};
use crate::telemetry::{FlushReason, TelemetryTracker};
use player_bridge::{EngineEvent, LoadedMedia};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

/// The playback session finite-state machine.
///
/// Created once in Idle, mutated only by controller operations and
/// engine-originated events, torn down once via [`shutdown`](Self::shutdown).
pub struct PlaybackSession {
    active_track: Option<Track>,
    state: PlaybackState,
    position_seconds: f64,
    duration_seconds: f64,
    buffering: bool,
    volume: VolumeState,
    last_error: Option<String>,
    generation: u64,
    telemetry: TelemetryTracker,
    events: broadcast::Sender<SessionEvent>,
}

impl PlaybackSession {
    pub fn new(
        initial_volume: f32,
        telemetry: TelemetryTracker,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            active_track: None,
            state: PlaybackState::Idle,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            buffering: false,
            volume: VolumeState::new(initial_volume),
            last_error: None,
            generation: 0,
            telemetry,
            events,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.active_track.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn duration_known(&self) -> bool {
        self.duration_seconds.is_finite() && self.duration_seconds > 0.0
    }

    fn progress_percent(&self) -> f64 {
        if self.state == PlaybackState::Ended {
            return 100.0;
        }
        if !self.duration_known() {
            return 0.0;
        }
        (100.0 * self.position_seconds / self.duration_seconds).clamp(0.0, 100.0)
    }

    /// Read-only view for presentation layers.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.active_track.clone(),
            is_playing: self.state == PlaybackState::Playing,
            is_loading: self.state == PlaybackState::Loading || self.buffering,
            progress_percent: self.progress_percent(),
            duration_seconds: self.duration_seconds,
            position_seconds: self.position_seconds,
            volume: self.volume.volume,
            is_muted: self.volume.muted,
            last_error: self.last_error.clone(),
        }
    }

    // ========================================================================
    // Transition core
    // ========================================================================

    /// Move to `next`, pairing telemetry with the Playing entry/exit edges.
    ///
    /// Every mutation of `state` goes through here; that is the invariant
    /// that makes "exactly one telemetry interval per playing sojourn" hold
    /// on every exit path.
    fn transition(&mut self, next: PlaybackState) {
        if self.state == next {
            return;
        }
        if self.state == PlaybackState::Playing {
            let reason = match next {
                PlaybackState::Paused => FlushReason::Paused,
                PlaybackState::Ended => FlushReason::Completed,
                PlaybackState::Errored => FlushReason::Errored,
                PlaybackState::Idle => FlushReason::Shutdown,
                _ => FlushReason::TrackChanged,
            };
            if let Some(flushed) = self.telemetry.end(reason) {
                self.emit(SessionEvent::SojournFlushed {
                    track_id: flushed.song_id,
                    duration_played: flushed.duration_played,
                });
            }
        }
        if next == PlaybackState::Playing {
            match &self.active_track {
                Some(track) => self.telemetry.start(&track.id),
                None => warn!("entering Playing without an active track"),
            }
        }
        debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
        self.emit(SessionEvent::StateChanged { state: next });
    }

    // ========================================================================
    // Controller-driven operations
    // ========================================================================

    /// Start loading `track`, superseding any pending load.
    ///
    /// Flushes the telemetry interval of a currently playing track, resets
    /// progress, and returns the new generation the caller must capture for
    /// its async settlements.
    pub fn begin_load(&mut self, track: &Track) -> u64 {
        self.generation += 1;
        self.last_error = None;
        self.transition(PlaybackState::Loading);
        let previous = self.active_track.replace(track.clone());
        self.position_seconds = 0.0;
        self.duration_seconds = 0.0;
        self.buffering = false;
        self.emit(SessionEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id: previous.map(|t| t.id),
        });
        self.generation
    }

    /// Settle a resolved load. Returns `false` when the settlement is stale
    /// (superseded by a newer `begin_load`) or no longer applicable.
    pub fn complete_load(&mut self, generation: u64, media: LoadedMedia) -> bool {
        if generation != self.generation {
            trace!(
                captured = generation,
                current = self.generation,
                "discarding stale load settlement"
            );
            return false;
        }
        if self.state != PlaybackState::Loading {
            return false;
        }
        if let Some(duration) = media.duration_seconds {
            if duration.is_finite() && duration > 0.0 {
                self.duration_seconds = duration;
            }
        }
        self.transition(PlaybackState::Ready);
        true
    }

    /// Settle a rejected load. Stale settlements are discarded silently.
    pub fn fail_load(&mut self, generation: u64, message: impl Into<String>) {
        if generation != self.generation {
            trace!(captured = generation, "discarding stale load failure");
            return;
        }
        let message = message.into();
        warn!(%message, "track load failed");
        self.buffering = false;
        self.last_error = Some(message.clone());
        self.transition(PlaybackState::Errored);
        self.emit(SessionEvent::Errored { message });
    }

    /// Settle a resolved play request. Opens the telemetry interval on the
    /// Playing entry edge. Returns `false` for stale settlements.
    pub fn complete_play(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            trace!(captured = generation, "discarding stale play settlement");
            return false;
        }
        if self.active_track.is_none() {
            return false;
        }
        self.transition(PlaybackState::Playing);
        true
    }

    /// Settle a rejected play request. Stale settlements are discarded.
    pub fn fail_play(&mut self, generation: u64, message: impl Into<String>) {
        if generation != self.generation {
            trace!(captured = generation, "discarding stale play failure");
            return;
        }
        let message = message.into();
        warn!(%message, "play request failed");
        self.last_error = Some(message.clone());
        self.transition(PlaybackState::Errored);
        self.emit(SessionEvent::Errored { message });
    }

    /// Controller-initiated pause.
    pub fn mark_paused(&mut self) {
        if self.state == PlaybackState::Playing {
            self.transition(PlaybackState::Paused);
        }
    }

    /// Seek to a percentage of the known duration.
    ///
    /// Permitted in Ready/Playing/Paused when duration is known; the target
    /// percent is clamped into `[0, 100]`. Returns the absolute target in
    /// seconds for the caller to forward to the engine, or `None` when the
    /// seek is a documented no-op.
    pub fn seek_to_percent(&mut self, percent: f64) -> Option<f64> {
        if !self.state.is_seekable() || !self.duration_known() || !percent.is_finite() {
            return None;
        }
        let percent = percent.clamp(0.0, 100.0);
        let target = self.duration_seconds * percent / 100.0;
        self.position_seconds = target;
        self.emit_progress();
        Some(target)
    }

    /// Move the position by `delta_seconds`, clamped into `[0, duration]`.
    ///
    /// Same permitted states and no-op rules as [`seek_to_percent`](Self::seek_to_percent).
    pub fn skip_by(&mut self, delta_seconds: f64) -> Option<f64> {
        if !self.state.is_seekable() || !self.duration_known() || !delta_seconds.is_finite() {
            return None;
        }
        let target = (self.position_seconds + delta_seconds).clamp(0.0, self.duration_seconds);
        self.position_seconds = target;
        self.emit_progress();
        Some(target)
    }

    /// Apply the volume coupling rule and return the resulting state for the
    /// caller to mirror into the engine.
    pub fn set_volume(&mut self, volume: f32) -> VolumeState {
        let before = self.volume;
        self.volume.set_volume(volume);
        if self.volume != before {
            self.emit(SessionEvent::VolumeChanged {
                volume: self.volume.volume,
                muted: self.volume.muted,
            });
        }
        self.volume
    }

    /// Flip mute. Returns the new muted flag.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.volume.toggle_muted();
        self.emit(SessionEvent::VolumeChanged {
            volume: self.volume.volume,
            muted,
        });
        muted
    }

    /// Tear the session down: flushes an open telemetry interval and returns
    /// to Idle. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.state != PlaybackState::Idle {
            self.transition(PlaybackState::Idle);
        }
        self.active_track = None;
        self.buffering = false;
        self.position_seconds = 0.0;
        self.duration_seconds = 0.0;
    }

    // ========================================================================
    // Engine-driven events
    // ========================================================================

    /// Apply one normalized engine event.
    ///
    /// Events always describe the engine's current stream; state checks here
    /// keep reports that no longer apply (e.g. a time update while a new
    /// track is loading) from mutating the session.
    pub fn apply_engine_event(&mut self, event: EngineEvent) {
        trace!(event = event.description(), "engine event");
        match event {
            EngineEvent::LoadedMetadata { duration_seconds } => {
                if let Some(duration) = duration_seconds {
                    if duration.is_finite() && duration > 0.0 {
                        self.duration_seconds = duration;
                    }
                }
                self.buffering = false;
            }
            EngineEvent::CanPlay => {
                self.last_error = None;
                self.buffering = false;
            }
            EngineEvent::CanPlayThrough => {
                self.buffering = false;
            }
            EngineEvent::Waiting => {
                self.buffering = true;
            }
            EngineEvent::Playing => {
                if self.active_track.is_some() {
                    self.transition(PlaybackState::Playing);
                }
            }
            EngineEvent::Paused => {
                self.mark_paused();
            }
            EngineEvent::Ended => {
                if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
                    if self.duration_known() {
                        self.position_seconds = self.duration_seconds;
                    }
                    self.transition(PlaybackState::Ended);
                    self.emit_progress();
                }
            }
            EngineEvent::Error { message } => {
                if self.state != PlaybackState::Idle {
                    self.buffering = false;
                    self.last_error = Some(message.clone());
                    self.transition(PlaybackState::Errored);
                    self.emit(SessionEvent::Errored { message });
                }
            }
            EngineEvent::TimeUpdate {
                position_seconds,
                duration_seconds,
            } => {
                if self.state.is_seekable()
                    && duration_seconds.is_finite()
                    && duration_seconds > 0.0
                {
                    self.duration_seconds = duration_seconds;
                    self.position_seconds = position_seconds.clamp(0.0, duration_seconds);
                    self.emit_progress();
                }
            }
        }
    }

    // ========================================================================
    // Event emission
    // ========================================================================

    fn emit_progress(&self) {
        self.emit(SessionEvent::Progress {
            position_seconds: self.position_seconds,
            duration_seconds: self.duration_seconds,
            progress_percent: self.progress_percent(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; observers come and go.
        let _ = self.events.send(event);
    }
}
