//! # Session State Types
//!
//! Value types shared by the session state machine and its observers.

use serde::{Deserialize, Serialize};

/// Minimal identifying metadata plus a resolvable media URI.
///
/// Immutable once handed to the session; catalog browsing and search live in
/// an external service and never flow through here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable track identifier, also used in telemetry records.
    pub id: String,
    /// Track title.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// URI the media engine can fetch and decode.
    pub source_uri: String,
}

/// Playback lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track has ever been loaded.
    Idle,
    /// A load request is in flight.
    Loading,
    /// The source is decoded and ready to start.
    Ready,
    /// Audio is playing; exactly one telemetry interval is open.
    Playing,
    /// Paused mid-track; position preserved.
    Paused,
    /// The track reached its natural end.
    Ended,
    /// A load or playback failure; `last_error` holds the message.
    Errored,
}

impl PlaybackState {
    /// States in which seeking and position updates are meaningful.
    pub fn is_seekable(self) -> bool {
        matches!(
            self,
            PlaybackState::Ready | PlaybackState::Playing | PlaybackState::Paused
        )
    }
}

/// Volume and mute, coupled in one place.
///
/// Setting a volume above zero clears mute; muting never alters the stored
/// volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeState {
    /// Stored volume, `0.0..=1.0`.
    pub volume: f32,
    /// Whether output is muted.
    pub muted: bool,
}

impl VolumeState {
    /// Create an unmuted state with `volume` clamped into range.
    pub fn new(volume: f32) -> Self {
        Self {
            volume: if volume.is_finite() {
                volume.clamp(0.0, 1.0)
            } else {
                0.0
            },
            muted: false,
        }
    }

    /// Apply the coupling rule: clamp, store, and unmute when audible.
    ///
    /// Non-finite inputs are ignored entirely; neither the stored volume nor
    /// the mute flag changes.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        if !volume.is_finite() {
            return self.volume;
        }
        self.volume = volume.clamp(0.0, 1.0);
        if self.volume > 0.0 {
            self.muted = false;
        }
        self.volume
    }

    /// Flip mute without touching the stored volume. Returns the new state.
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }
}

/// Read-only view of the session consumed by presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    /// The active track, if any.
    pub current_track: Option<Track>,
    /// True exactly in the Playing state.
    pub is_playing: bool,
    /// True while loading a track or while the engine is buffering.
    pub is_loading: bool,
    /// Derived progress, `0.0..=100.0`.
    pub progress_percent: f64,
    /// Total duration in seconds; `0.0` while unknown.
    pub duration_seconds: f64,
    /// Current position in seconds.
    pub position_seconds: f64,
    /// Stored volume, `0.0..=1.0`.
    pub volume: f32,
    /// Whether output is muted.
    pub is_muted: bool,
    /// Most recent user-visible failure, if any.
    pub last_error: Option<String>,
}

/// Render seconds as `m:ss` for display.
///
/// Non-finite and negative inputs render as `0:00`.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
