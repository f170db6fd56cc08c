//! # Playback Session Core
//!
//! Session management on top of a single-stream media engine.
//!
//! ## Overview
//!
//! This crate handles:
//! - The playback session state machine (load, play, pause, end, error)
//! - Supersession of in-flight loads with a generation guard
//! - Listening telemetry, flushed exactly once per playing sojourn
//! - Volume/mute coupling, seeking, and skip steps
//! - A [`PlayerController`] facade that never holds its lock across an await

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod logging;
pub mod session;
pub mod state;
pub mod telemetry;

pub use config::PlayerConfig;
pub use controller::{PlayerController, PlayerDependencies};
pub use error::{PlayerError, Result};
pub use events::SessionEvent;
pub use session::PlaybackSession;
pub use state::{format_timestamp, PlaybackState, PlayerSnapshot, Track, VolumeState};
pub use telemetry::{FlushReason, TelemetryTracker};
