//! Telemetry sink contract.
//!
//! Completed listening intervals are pushed to an external recorder as
//! [`PlayEvent`]s. Delivery is fire-and-forget and best-effort: a failed
//! delivery is logged by the caller but never retried and never allowed to
//! affect playback.

use crate::error::TelemetryError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One completed listening interval.
///
/// Field names are the wire contract of the external recorder; do not rename
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// Identifier of the track that was listened to.
    pub song_id: String,
    /// Wall-clock seconds the track actually played.
    pub duration_played: f64,
}

/// Receiver for completed play events.
///
/// `record` returns as soon as the event has been handed off; sinks that talk
/// to a remote recorder are expected to enqueue internally rather than block
/// the playback session.
pub trait TelemetrySink: Send + Sync {
    /// Hand off a completed play event.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::DeliveryFailed`] when the event could not be
    /// accepted. Callers log and move on.
    fn record(&self, event: PlayEvent) -> Result<(), TelemetryError>;
}

/// Sink that keeps every recorded event in memory.
///
/// Used by tests and by hosts that batch-upload on their own schedule.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PlayEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<PlayEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl TelemetrySink for MemorySink {
    fn record(&self, event: PlayEvent) -> Result<(), TelemetryError> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record(&self, _event: PlayEvent) -> Result<(), TelemetryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_collects_events() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.record(PlayEvent {
            song_id: "s1".to_string(),
            duration_played: 12.5,
        })
        .unwrap();
        sink.record(PlayEvent {
            song_id: "s2".to_string(),
            duration_played: 3.0,
        })
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].song_id, "s1");
        assert_eq!(events[1].duration_played, 3.0);
    }

    #[test]
    fn play_event_wire_format() {
        let event = PlayEvent {
            song_id: "abc123".to_string(),
            duration_played: 42.75,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["song_id"], "abc123");
        assert_eq!(json["duration_played"], 42.75);
    }

    #[test]
    fn null_sink_accepts_everything() {
        let sink = NullSink;
        assert!(sink
            .record(PlayEvent {
                song_id: "x".to_string(),
                duration_played: 0.0,
            })
            .is_ok());
    }
}
