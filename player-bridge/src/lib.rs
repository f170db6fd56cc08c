//! # Host Bridge Contracts
//!
//! Abstractions the playback session core requires from its host platform.
//!
//! ## Overview
//!
//! The core owns exactly one media engine for its entire lifetime and drives
//! it through the traits in this crate. Each trait represents a capability
//! that must be implemented differently per host (web audio element, desktop
//! decoder pipeline, test harness):
//!
//! - [`MediaEngine`](engine::MediaEngine) - single-stream decode/playback
//!   primitive with a normalized event stream
//! - [`TelemetrySink`](telemetry::TelemetrySink) - external recorder for
//!   per-listen play events
//! - [`Clock`](time::Clock) - time source for deterministic testing
//!
//! ## Error Handling
//!
//! Engine operations use [`EngineError`](error::EngineError); telemetry
//! delivery uses [`TelemetryError`](error::TelemetryError). Host
//! implementations should convert platform-specific failures into these
//! types with actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a session can be driven from
//! async tasks behind an `Arc`.

pub mod engine;
pub mod error;
pub mod telemetry;
pub mod time;

pub use engine::{EngineEvent, LoadedMedia, MediaEngine};
pub use error::{EngineError, Result, TelemetryError};
pub use telemetry::{MemorySink, NullSink, PlayEvent, TelemetrySink};
pub use time::{Clock, ManualClock, SystemClock};
