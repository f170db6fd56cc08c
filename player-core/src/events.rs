//! # Session Events
//!
//! Typed events published by the playback session for presentation code and
//! other observers, broadcast over `tokio::sync::broadcast`. Subscribers that
//! fall behind receive `RecvError::Lagged` and can keep consuming; emission
//! with no subscribers is simply dropped.

use crate::state::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted as the session state evolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// The finite-state machine moved to a new state.
    StateChanged {
        /// The new playback state.
        state: PlaybackState,
    },
    /// The active track was replaced.
    TrackChanged {
        /// ID of the new active track.
        track_id: String,
        /// ID of the previous active track, if any.
        previous_track_id: Option<String>,
    },
    /// Playback position moved (engine report or seek).
    Progress {
        /// Current position in seconds.
        position_seconds: f64,
        /// Total duration in seconds.
        duration_seconds: f64,
        /// Derived progress, `0.0..=100.0`.
        progress_percent: f64,
    },
    /// Volume or mute changed.
    VolumeChanged {
        /// Stored volume, `0.0..=1.0`.
        volume: f32,
        /// Whether output is muted.
        muted: bool,
    },
    /// A playing sojourn closed and its telemetry interval was flushed.
    SojournFlushed {
        /// Track the interval belonged to.
        track_id: String,
        /// Wall-clock seconds the track played.
        duration_played: f64,
    },
    /// The session entered the Errored state.
    Errored {
        /// Human-readable error message, mirrored in `last_error`.
        message: String,
    },
}

impl SessionEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            SessionEvent::StateChanged { .. } => "Playback state changed",
            SessionEvent::TrackChanged { .. } => "Active track changed",
            SessionEvent::Progress { .. } => "Playback position changed",
            SessionEvent::VolumeChanged { .. } => "Volume changed",
            SessionEvent::SojournFlushed { .. } => "Listening interval flushed",
            SessionEvent::Errored { .. } => "Session error",
        }
    }
}
