//! Shared test doubles for controller-level tests.

// Each test binary compiles this module; not all of them use every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use player_bridge::{
    Clock, EngineError, EngineEvent, LoadedMedia, MediaEngine, Result as EngineResult,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};

/// Scriptable [`MediaEngine`] double.
///
/// Outcomes for `load` and `play` are queued up front; when the queue is
/// empty the calls succeed with sensible defaults (a 180 second track, play
/// accepted). Optional gates let a test hold a `load` call open to exercise
/// interleavings with later requests.
pub struct ScriptedEngine {
    load_results: Mutex<VecDeque<EngineResult<LoadedMedia>>>,
    play_results: Mutex<VecDeque<EngineResult<()>>>,
    load_gates: Mutex<VecDeque<Arc<Notify>>>,
    events: broadcast::Sender<EngineEvent>,

    pub load_calls: AtomicUsize,
    pub play_calls: AtomicUsize,
    pub pause_calls: AtomicUsize,
    pub loaded_uris: Mutex<Vec<String>>,
    pub seeks: Mutex<Vec<f64>>,
    pub volumes: Mutex<Vec<f32>>,
    pub muted_states: Mutex<Vec<bool>>,
    pub released: AtomicBool,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            load_results: Mutex::new(VecDeque::new()),
            play_results: Mutex::new(VecDeque::new()),
            load_gates: Mutex::new(VecDeque::new()),
            events,
            load_calls: AtomicUsize::new(0),
            play_calls: AtomicUsize::new(0),
            pause_calls: AtomicUsize::new(0),
            loaded_uris: Mutex::new(Vec::new()),
            seeks: Mutex::new(Vec::new()),
            volumes: Mutex::new(Vec::new()),
            muted_states: Mutex::new(Vec::new()),
            released: AtomicBool::new(false),
        }
    }

    /// Queue the outcome of the next `load` call.
    pub fn push_load_result(&self, result: EngineResult<LoadedMedia>) {
        self.load_results.lock().push_back(result);
    }

    /// Queue the outcome of the next `play` call.
    pub fn push_play_result(&self, result: EngineResult<()>) {
        self.play_results.lock().push_back(result);
    }

    /// Make the next `load` call wait until the returned handle is notified.
    pub fn gate_next_load(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.load_gates.lock().push_back(gate.clone());
        gate
    }

    /// Broadcast a normalized engine event to subscribers.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl MediaEngine for ScriptedEngine {
    async fn load(&self, uri: &str) -> EngineResult<LoadedMedia> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.loaded_uris.lock().push(uri.to_string());

        // Outcomes are claimed in call order even when a later call overtakes
        // a gated one.
        let result = self
            .load_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(LoadedMedia::with_duration(180.0)));

        let gate = self.load_gates.lock().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        result
    }

    async fn play(&self) -> EngineResult<()> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        self.play_results.lock().pop_front().unwrap_or(Ok(()))
    }

    fn pause(&self) {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn seek_to(&self, seconds: f64) {
        self.seeks.lock().push(seconds);
    }

    fn set_volume(&self, volume: f32) {
        self.volumes.lock().push(volume);
    }

    fn set_muted(&self, muted: bool) {
        self.muted_states.lock().push(muted);
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// `load` failure shorthand.
pub fn load_failure(message: &str) -> EngineError {
    EngineError::LoadFailed(message.to_string())
}

/// Build a track with predictable fields from an id.
pub fn track(id: &str) -> player_core::Track {
    player_core::Track {
        id: id.to_string(),
        title: format!("Title {id}"),
        artist: "Artist".to_string(),
        source_uri: format!("https://cdn.example/{id}.mp3"),
    }
}

/// Wire a controller to a fresh engine, memory sink, and manual clock.
pub fn controller_fixture() -> Fixture {
    controller_fixture_with_config(player_core::PlayerConfig::default())
}

pub fn controller_fixture_with_config(config: player_core::PlayerConfig) -> Fixture {
    let engine = Arc::new(ScriptedEngine::new());
    let sink = Arc::new(player_bridge::MemorySink::new());
    let clock = Arc::new(player_bridge::ManualClock::from_system_time());
    let controller = player_core::PlayerController::new(
        config,
        player_core::PlayerDependencies {
            engine: engine.clone(),
            telemetry_sink: sink.clone(),
            clock: clock.clone() as Arc<dyn Clock>,
        },
    );
    Fixture {
        controller,
        engine,
        sink,
        clock,
    }
}

pub struct Fixture {
    pub controller: player_core::PlayerController,
    pub engine: Arc<ScriptedEngine>,
    pub sink: Arc<player_bridge::MemorySink>,
    pub clock: Arc<player_bridge::ManualClock>,
}
