use thiserror::Error;

/// Errors surfaced by host media engine implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The backend could not fetch or decode the requested source.
    #[error("Failed to load media source: {0}")]
    LoadFailed(String),

    /// The platform refused to start playback without a user gesture.
    #[error("Playback blocked by platform: {0}")]
    PlaybackBlocked(String),

    /// Any other engine operation failed.
    #[error("Engine operation failed: {0}")]
    OperationFailed(String),
}

/// Errors surfaced by telemetry sink implementations.
///
/// Delivery is best-effort; callers log these and never retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Telemetry delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
