//! # Player Configuration
//!
//! Configuration for the playback session core.

use serde::{Deserialize, Serialize};

/// Playback session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Volume applied when the session is created, `0.0..=1.0`.
    ///
    /// Default: 0.7.
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Step applied by `skip_forward` / `skip_backward`, in seconds.
    ///
    /// Default: 10 seconds.
    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,

    /// Buffer capacity of the session event channel.
    ///
    /// Observers that fall behind by more than this many events receive a
    /// `Lagged` error and keep going.
    ///
    /// Default: 100.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: default_initial_volume(),
            skip_seconds: default_skip_seconds(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl PlayerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a descriptive message for the first out-of-range value.
    pub fn validate(&self) -> Result<(), String> {
        if !self.initial_volume.is_finite() || !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(format!(
                "initial_volume must be within [0.0, 1.0], got {}",
                self.initial_volume
            ));
        }
        if !self.skip_seconds.is_finite() || self.skip_seconds <= 0.0 {
            return Err(format!(
                "skip_seconds must be positive, got {}",
                self.skip_seconds
            ));
        }
        if self.event_buffer == 0 {
            return Err("event_buffer must be at least 1".to_string());
        }
        Ok(())
    }
}

fn default_initial_volume() -> f32 {
    0.7
}

fn default_skip_seconds() -> f64 {
    10.0
}

fn default_event_buffer() -> usize {
    100
}
