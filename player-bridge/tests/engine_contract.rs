//! Contract tests for the `MediaEngine` bridge trait.
//!
//! Verifies that the trait surface can be mocked for host-side testing and
//! that error/event types round-trip through it as expected.

use async_trait::async_trait;
use mockall::mock;
use player_bridge::{EngineError, EngineEvent, LoadedMedia, MediaEngine, Result};
use tokio::sync::broadcast;

mock! {
    pub Engine {}

    #[async_trait]
    impl MediaEngine for Engine {
        async fn load(&self, uri: &str) -> Result<LoadedMedia>;
        async fn play(&self) -> Result<()>;
        fn pause(&self);
        fn seek_to(&self, seconds: f64);
        fn set_volume(&self, volume: f32);
        fn set_muted(&self, muted: bool);
        fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
        fn release(&self);
    }
}

#[tokio::test]
async fn load_resolves_with_media_metadata() {
    let mut engine = MockEngine::new();
    engine
        .expect_load()
        .withf(|uri| uri == "https://cdn.example/track.mp3")
        .times(1)
        .returning(|_| Ok(LoadedMedia::with_duration(201.0)));

    let media = engine
        .load("https://cdn.example/track.mp3")
        .await
        .expect("load should resolve");
    assert_eq!(media.duration_seconds, Some(201.0));
}

#[tokio::test]
async fn play_surfaces_platform_refusal() {
    let mut engine = MockEngine::new();
    engine
        .expect_play()
        .times(1)
        .returning(|| Err(EngineError::PlaybackBlocked("user gesture required".into())));

    let err = engine.play().await.unwrap_err();
    assert!(matches!(err, EngineError::PlaybackBlocked(_)));
}

#[tokio::test]
async fn subscribers_observe_the_normalized_stream() {
    let (tx, _) = broadcast::channel(16);
    let sender = tx.clone();

    let mut engine = MockEngine::new();
    engine.expect_subscribe().returning(move || tx.subscribe());

    let mut rx = engine.subscribe();
    sender.send(EngineEvent::CanPlay).unwrap();
    sender
        .send(EngineEvent::TimeUpdate {
            position_seconds: 1.0,
            duration_seconds: 180.0,
        })
        .unwrap();

    assert_eq!(rx.recv().await.unwrap(), EngineEvent::CanPlay);
    assert!(matches!(
        rx.recv().await.unwrap(),
        EngineEvent::TimeUpdate { .. }
    ));
}

#[tokio::test]
async fn release_is_idempotent_for_hosts() {
    let mut engine = MockEngine::new();
    engine.expect_release().times(2).return_const(());

    engine.release();
    engine.release();
}
