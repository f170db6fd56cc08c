//! # Player Error Types
//!
//! User-visible failures of the playback session core. Everything else is
//! recovered locally: out-of-range seeks are clamped, invalid volumes are
//! clamped, stale async settlements are discarded, and telemetry delivery
//! failures are logged and swallowed.

use player_bridge::EngineError;
use thiserror::Error;

/// Errors that can escape the controller facade.
///
/// Both variants are recoverable: the session lands in the Errored state with
/// `last_error` set, and a subsequent `play_track` is always accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The backend failed to fetch or decode a track.
    #[error("Failed to load track: {0}")]
    Load(String),

    /// The platform refused autonomous playback (user-gesture requirement).
    #[error("Playback blocked: {0}")]
    PlaybackBlocked(String),
}

impl PlayerError {
    /// Classify an engine failure observed while loading a source.
    pub(crate) fn from_load(err: EngineError) -> Self {
        match err {
            EngineError::PlaybackBlocked(msg) => PlayerError::PlaybackBlocked(msg),
            EngineError::LoadFailed(msg) | EngineError::OperationFailed(msg) => {
                PlayerError::Load(msg)
            }
        }
    }

    /// Classify an engine failure observed while starting playback.
    pub(crate) fn from_play(err: EngineError) -> Self {
        match err {
            EngineError::PlaybackBlocked(msg) => PlayerError::PlaybackBlocked(msg),
            EngineError::LoadFailed(msg) | EngineError::OperationFailed(msg) => {
                PlayerError::Load(msg)
            }
        }
    }
}

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
