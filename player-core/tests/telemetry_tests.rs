//! Listening-telemetry tests
//!
//! Verifies the one-interval-per-sojourn accounting across pause/resume
//! cycles, the RAII flush on teardown, and isolation from sink failures.

mod support;

use chrono::Duration;
use player_bridge::{Clock, ManualClock, PlayEvent, TelemetrySink};
use player_core::{PlayerConfig, PlayerController, PlayerDependencies};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use support::{controller_fixture, track, ScriptedEngine};

#[tokio::test]
async fn each_pause_resume_cycle_yields_its_own_interval() {
    let fixture = controller_fixture();

    fixture.controller.play_track(track("s1")).await.unwrap();
    fixture.clock.advance(Duration::seconds(10));
    fixture.controller.toggle_play().await;

    // Time spent paused is not listening time.
    fixture.clock.advance(Duration::seconds(60));

    fixture.controller.toggle_play().await;
    fixture.clock.advance(Duration::seconds(7));
    fixture.controller.pause();

    let events = fixture.sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].song_id, "s1");
    assert_eq!(events[0].duration_played, 10.0);
    assert_eq!(events[1].song_id, "s1");
    assert_eq!(events[1].duration_played, 7.0);
}

#[tokio::test]
async fn dropping_the_controller_flushes_the_open_interval() {
    let fixture = controller_fixture();

    fixture.controller.play_track(track("s1")).await.unwrap();
    fixture.clock.advance(Duration::milliseconds(1500));

    drop(fixture.controller);

    let events = fixture.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].song_id, "s1");
    assert_eq!(events[0].duration_played, 1.5);
}

#[tokio::test]
async fn a_failing_sink_never_disturbs_playback() {
    struct FailingSink {
        attempts: AtomicUsize,
    }
    impl TelemetrySink for FailingSink {
        fn record(&self, _event: PlayEvent) -> Result<(), player_bridge::TelemetryError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(player_bridge::TelemetryError::DeliveryFailed(
                "recorder offline".into(),
            ))
        }
    }

    let engine = Arc::new(ScriptedEngine::new());
    let sink = Arc::new(FailingSink {
        attempts: AtomicUsize::new(0),
    });
    let clock = Arc::new(ManualClock::from_system_time());
    let controller = PlayerController::new(
        PlayerConfig::default(),
        PlayerDependencies {
            engine: engine.clone(),
            telemetry_sink: sink.clone(),
            clock: clock.clone() as Arc<dyn Clock>,
        },
    );

    controller.play_track(track("s1")).await.unwrap();
    clock.advance(Duration::seconds(3));
    controller.pause();
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);

    // Playback continues as if nothing happened.
    controller.toggle_play().await;
    assert!(controller.snapshot().is_playing);
    clock.advance(Duration::seconds(2));
    controller.pause();
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn sub_second_listening_is_reported_fractionally() {
    let fixture = controller_fixture();

    fixture.controller.play_track(track("s1")).await.unwrap();
    fixture.clock.advance(Duration::milliseconds(250));
    fixture.controller.pause();

    let events = fixture.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].duration_played, 0.25);
}
