//! # Telemetry Tracking
//!
//! Measures wall-clock "playing" sojourns and flushes each one into exactly
//! one [`PlayEvent`]. The tracker is driven in lock-step with the state
//! machine's Playing entry/exit edges; its `Drop` implementation flushes a
//! still-open interval so no listening time is lost on teardown.

use chrono::{DateTime, Utc};
use player_bridge::{Clock, PlayEvent, TelemetrySink};
use std::sync::Arc;
use tracing::{debug, warn};

/// Why a sojourn closed. Logged alongside the flushed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReason {
    /// The listener paused.
    Paused,
    /// The track reached its natural end.
    Completed,
    /// A different track superseded the playing one.
    TrackChanged,
    /// Playback failed mid-sojourn; partial duration is recorded.
    Errored,
    /// The session is being torn down.
    Shutdown,
}

#[derive(Debug, Clone)]
struct OpenInterval {
    track_id: String,
    started_at: DateTime<Utc>,
}

/// Tracks at most one open listening interval.
pub struct TelemetryTracker {
    clock: Arc<dyn Clock>,
    sink: Arc<dyn TelemetrySink>,
    open: Option<OpenInterval>,
}

impl TelemetryTracker {
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            clock,
            sink,
            open: None,
        }
    }

    /// Open an interval for `track_id` at the current wall-clock time.
    ///
    /// Callers are expected to pair `start`/`end` exactly with the Playing
    /// entry/exit edges; a mispaired `start` asserts in debug builds. If an
    /// interval is somehow still open in release builds it is flushed first,
    /// so listening time is never silently dropped.
    pub fn start(&mut self, track_id: &str) {
        debug_assert!(
            self.open.is_none(),
            "telemetry interval for {:?} still open when starting {track_id:?}",
            self.open_track_id()
        );
        if self.open.is_some() {
            warn!(track_id, "telemetry interval still open; flushing before reopening");
            self.end(FlushReason::TrackChanged);
        }
        self.open = Some(OpenInterval {
            track_id: track_id.to_string(),
            started_at: self.clock.now(),
        });
        debug!(track_id, "telemetry interval opened");
    }

    /// Close the open interval, if any, and push it to the sink.
    ///
    /// Delivery failures are logged and swallowed; they never affect
    /// playback. Returns the flushed event so the session can mirror it on
    /// its event bus.
    pub fn end(&mut self, reason: FlushReason) -> Option<PlayEvent> {
        let interval = self.open.take()?;
        let elapsed_ms = (self.clock.now() - interval.started_at)
            .num_milliseconds()
            .max(0);
        let event = PlayEvent {
            song_id: interval.track_id,
            duration_played: elapsed_ms as f64 / 1000.0,
        };
        debug!(
            track_id = %event.song_id,
            duration_played = event.duration_played,
            ?reason,
            "telemetry interval flushed"
        );
        if let Err(err) = self.sink.record(event.clone()) {
            warn!(%err, "telemetry delivery failed; event dropped");
        }
        Some(event)
    }

    /// Whether an interval is currently open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Track the open interval belongs to, if any.
    pub fn open_track_id(&self) -> Option<&str> {
        self.open.as_ref().map(|interval| interval.track_id.as_str())
    }
}

impl Drop for TelemetryTracker {
    fn drop(&mut self) {
        self.end(FlushReason::Shutdown);
    }
}
