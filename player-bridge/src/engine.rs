//! Media engine bridge trait and normalized event stream.
//!
//! The session core mediates between presentation code and exactly one
//! single-stream media engine. Host platforms wrap their native primitive
//! (an HTML audio element, a decoder pipeline, a test double) behind
//! [`MediaEngine`] and translate its callbacks into [`EngineEvent`]s.
//!
//! ## Superseding loads
//!
//! At most one load is "current" at a time. A new `load` call supersedes the
//! previous one, but the engine is *not* required to abort in-flight network
//! activity for the superseded call; the core discards stale settlements with
//! a generation guard. Implementations only have to make sure a superseded
//! load never clobbers the stream state of the newer one.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Metadata available once a source is ready to start playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadedMedia {
    /// Total duration in seconds, when the container reports a finite value.
    pub duration_seconds: Option<f64>,
}

impl LoadedMedia {
    /// Describe a source whose duration is known.
    pub fn with_duration(seconds: f64) -> Self {
        Self {
            duration_seconds: Some(seconds),
        }
    }

    /// Describe a source whose duration is not yet known (live stream,
    /// metadata still pending).
    pub fn unknown_duration() -> Self {
        Self {
            duration_seconds: None,
        }
    }
}

/// Normalized events emitted by a media engine.
///
/// These mirror the lifecycle of a single-stream playback primitive. Events
/// always describe the engine's *current* stream; the core is responsible for
/// ignoring events that can no longer apply to its session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EngineEvent {
    /// Container metadata became available.
    LoadedMetadata {
        /// Total duration in seconds, if finite.
        duration_seconds: Option<f64>,
    },
    /// Enough data is buffered to start playback.
    CanPlay,
    /// The engine started producing audio.
    Playing,
    /// The engine paused.
    Paused,
    /// The engine stalled waiting for data.
    Waiting,
    /// The whole stream can play without further buffering.
    CanPlayThrough,
    /// The stream reached its natural end.
    Ended,
    /// The engine failed; the stream is no longer usable.
    Error {
        /// Human-readable failure description.
        message: String,
    },
    /// Periodic position report.
    TimeUpdate {
        /// Current position in seconds.
        position_seconds: f64,
        /// Total duration in seconds.
        duration_seconds: f64,
    },
}

impl EngineEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            EngineEvent::LoadedMetadata { .. } => "Metadata loaded",
            EngineEvent::CanPlay => "Ready to play",
            EngineEvent::Playing => "Playback started",
            EngineEvent::Paused => "Playback paused",
            EngineEvent::Waiting => "Buffering",
            EngineEvent::CanPlayThrough => "Fully buffered",
            EngineEvent::Ended => "Stream ended",
            EngineEvent::Error { .. } => "Engine error",
            EngineEvent::TimeUpdate { .. } => "Position update",
        }
    }
}

/// Single-stream media decode/playback primitive.
///
/// Implementations own one platform stream at a time. `load` replaces the
/// current stream; the synchronous controls apply to whatever stream is
/// current when they are called.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Begin fetching/decoding `uri`. Resolves when playback is ready to
    /// start.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LoadFailed`](crate::error::EngineError) when
    /// the source cannot be fetched or decoded.
    async fn load(&self, uri: &str) -> Result<LoadedMedia>;

    /// Start or resume playback of the current stream.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PlaybackBlocked`](crate::error::EngineError)
    /// when the platform refuses autonomous playback (user-gesture
    /// requirement).
    async fn play(&self) -> Result<()>;

    /// Pause the current stream. Position is preserved.
    fn pause(&self);

    /// Seek to an absolute position in seconds.
    ///
    /// Must be a no-op while the stream duration is unknown or not finite.
    fn seek_to(&self, seconds: f64);

    /// Set the output volume, `0.0..=1.0`.
    fn set_volume(&self, volume: f32);

    /// Mute or unmute the output without changing the stored volume.
    fn set_muted(&self, muted: bool);

    /// Subscribe to the normalized event stream.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;

    /// Detach listeners and release the underlying handle. Idempotent.
    fn release(&self);
}
