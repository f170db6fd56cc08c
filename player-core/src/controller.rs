//! # Player Controller
//!
//! The facade presentation code talks to. It owns the playback session behind
//! a mutex, drives the media engine, and forwards session events to
//! subscribers.
//!
//! ## Locking discipline
//!
//! The session mutex is never held across an await. Each operation locks,
//! plans what to do and captures the current generation, unlocks, performs
//! the async engine call, then re-locks to settle the outcome with the
//! generation guard deciding whether the settlement still applies.

use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::events::SessionEvent;
use crate::session::PlaybackSession;
use crate::state::{PlaybackState, PlayerSnapshot, Track};
use crate::telemetry::TelemetryTracker;
use parking_lot::Mutex;
use player_bridge::{Clock, EngineEvent, MediaEngine, TelemetrySink};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// External collaborators injected into the controller.
pub struct PlayerDependencies {
    /// The single-stream media primitive.
    pub engine: Arc<dyn MediaEngine>,
    /// Destination for flushed listening intervals.
    pub telemetry_sink: Arc<dyn TelemetrySink>,
    /// Wall-clock source for telemetry timing.
    pub clock: Arc<dyn Clock>,
}

enum PlayPlan {
    /// The requested track is already playing.
    AlreadyPlaying,
    /// Same track, currently paused: resume without reloading.
    Resume(u64),
    /// Different (or first) track: load it fresh.
    Load(u64),
}

enum ToggleAction {
    Nothing,
    Pause,
    Resume(u64),
}

/// Facade over the playback session and media engine.
///
/// Cheap to clone; all clones share the same session.
#[derive(Clone)]
pub struct PlayerController {
    session: Arc<Mutex<PlaybackSession>>,
    engine: Arc<dyn MediaEngine>,
    events: broadcast::Sender<SessionEvent>,
    config: PlayerConfig,
}

impl PlayerController {
    /// Build a controller and apply the configured initial volume to the
    /// engine.
    pub fn new(config: PlayerConfig, deps: PlayerDependencies) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer);
        let telemetry = TelemetryTracker::new(deps.clock, deps.telemetry_sink);
        let session = PlaybackSession::new(config.initial_volume, telemetry, events.clone());

        deps.engine.set_volume(config.initial_volume);

        Self {
            session: Arc::new(Mutex::new(session)),
            engine: deps.engine,
            events,
            config,
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current read-only view of the session.
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.session.lock().snapshot()
    }

    // ========================================================================
    // Track selection and playback
    // ========================================================================

    /// Select `track` and start playing it.
    ///
    /// Requesting the track that is already playing is a no-op; requesting
    /// the paused track resumes it without reloading. Any in-flight load is
    /// superseded and its settlement discarded.
    ///
    /// # Errors
    ///
    /// Returns this request's load or playback failure. Failures of a
    /// superseded request are returned to the caller that awaited it but
    /// never alter session state.
    pub async fn play_track(&self, track: Track) -> Result<()> {
        let plan = {
            let mut session = self.session.lock();
            let same_track = session
                .active_track()
                .map(|active| active.id == track.id)
                .unwrap_or(false);
            match (same_track, session.state()) {
                (true, PlaybackState::Playing) => PlayPlan::AlreadyPlaying,
                (true, PlaybackState::Paused) => PlayPlan::Resume(session.generation()),
                _ => PlayPlan::Load(session.begin_load(&track)),
            }
        };

        match plan {
            PlayPlan::AlreadyPlaying => {
                debug!(track_id = %track.id, "track already playing");
                Ok(())
            }
            PlayPlan::Resume(generation) => {
                debug!(track_id = %track.id, "resuming paused track");
                self.request_play(generation).await
            }
            PlayPlan::Load(generation) => {
                info!(track_id = %track.id, "loading track");
                match self.engine.load(&track.source_uri).await {
                    Ok(media) => {
                        let settled = self.session.lock().complete_load(generation, media);
                        if !settled {
                            // Superseded while the load was in flight.
                            return Ok(());
                        }
                    }
                    Err(err) => {
                        self.session.lock().fail_load(generation, err.to_string());
                        return Err(PlayerError::from_load(err));
                    }
                }
                self.request_play(generation).await
            }
        }
    }

    /// Toggle between playing and paused.
    ///
    /// No-op when no track is selected. Resume failures land the session in
    /// the Errored state but are not returned; the caller observes them via
    /// the snapshot and event stream.
    pub async fn toggle_play(&self) {
        let action = {
            let mut session = self.session.lock();
            match session.state() {
                PlaybackState::Playing => {
                    session.mark_paused();
                    ToggleAction::Pause
                }
                PlaybackState::Ready | PlaybackState::Paused | PlaybackState::Ended
                    if session.active_track().is_some() =>
                {
                    ToggleAction::Resume(session.generation())
                }
                _ => ToggleAction::Nothing,
            }
        };

        match action {
            ToggleAction::Nothing => {}
            ToggleAction::Pause => self.engine.pause(),
            ToggleAction::Resume(generation) => {
                if let Err(err) = self.request_play(generation).await {
                    warn!(%err, "resume failed");
                }
            }
        }
    }

    /// Pause if playing; no-op otherwise.
    pub fn pause(&self) {
        let was_playing = {
            let mut session = self.session.lock();
            let playing = session.state() == PlaybackState::Playing;
            if playing {
                session.mark_paused();
            }
            playing
        };
        if was_playing {
            self.engine.pause();
        }
    }

    async fn request_play(&self, generation: u64) -> Result<()> {
        match self.engine.play().await {
            Ok(()) => {
                self.session.lock().complete_play(generation);
                Ok(())
            }
            Err(err) => {
                self.session.lock().fail_play(generation, err.to_string());
                Err(PlayerError::from_play(err))
            }
        }
    }

    // ========================================================================
    // Volume and seeking
    // ========================================================================

    /// Set the output volume, clamped into `[0.0, 1.0]`. A volume above zero
    /// clears mute.
    pub fn set_volume(&self, volume: f32) {
        let state = self.session.lock().set_volume(volume);
        self.engine.set_volume(state.volume);
        self.engine.set_muted(state.muted);
    }

    /// Flip mute without touching the stored volume.
    pub fn toggle_mute(&self) {
        let muted = self.session.lock().toggle_mute();
        self.engine.set_muted(muted);
    }

    /// Seek to a percentage of the track, clamped into `[0, 100]`.
    ///
    /// No-op while no track is loaded or the duration is unknown.
    pub fn seek_to_percent(&self, percent: f64) {
        if let Some(target) = self.session.lock().seek_to_percent(percent) {
            self.engine.seek_to(target);
        }
    }

    /// Skip forward by the configured step, clamped to the track end.
    pub fn skip_forward(&self) {
        self.skip_by(self.config.skip_seconds);
    }

    /// Skip backward by the configured step, clamped to the track start.
    pub fn skip_backward(&self) {
        self.skip_by(-self.config.skip_seconds);
    }

    fn skip_by(&self, delta_seconds: f64) {
        if let Some(target) = self.session.lock().skip_by(delta_seconds) {
            self.engine.seek_to(target);
        }
    }

    // ========================================================================
    // Engine event pump and teardown
    // ========================================================================

    /// Apply one normalized engine event to the session.
    ///
    /// This is the synchronous entry point used by [`run_event_loop`](Self::run_event_loop)
    /// and by tests that drive engine events deterministically.
    pub fn apply_engine_event(&self, event: EngineEvent) {
        self.session.lock().apply_engine_event(event);
    }

    /// Pump normalized engine events into the session until the engine drops
    /// its event channel.
    ///
    /// Subscribe with [`MediaEngine::subscribe`] and spawn this once per
    /// controller; lagging is logged and recoverable.
    pub async fn run_event_loop(&self, mut receiver: broadcast::Receiver<EngineEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.apply_engine_event(event);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "engine event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("engine event stream closed");
                    break;
                }
            }
        }
    }

    /// Tear down the session: flushes any open telemetry interval and
    /// releases the engine's stream resources. Safe to call more than once.
    pub fn shutdown(&self) {
        info!("shutting down player controller");
        self.session.lock().shutdown();
        self.engine.release();
    }
}
