use super::fake::{Call, FakeEngine};
use super::*;
use super::types::EngineInfo;
use std::path::Path;
use std::time::Duration;

#[test]
fn speed_range_brackets_normal_speed() {
    assert!(MIN_SPEED > 0.0);
    assert!((MIN_SPEED..=MAX_SPEED).contains(&1.0));
}

#[test]
fn fake_engine_records_calls_in_order() {
    let mut engine = FakeEngine::default();
    engine.open(Path::new("/music/a.mp3")).unwrap();
    engine.play();
    engine.set_position(Duration::from_secs(3));
    engine.stop();

    assert_eq!(
        engine.calls,
        vec![
            Call::Open("/music/a.mp3".into()),
            Call::Play,
            Call::SetPosition(Duration::from_secs(3)),
            Call::Stop,
        ]
    );
}

#[test]
fn engine_info_defaults_to_nothing_loaded() {
    let info = EngineInfo::default();
    assert!(!info.loaded);
    assert!(!info.playing);
    assert_eq!(info.position, Duration::ZERO);
    assert_eq!(info.duration, None);
}

#[test]
fn snapshot_from_an_earlier_open_reads_as_empty() {
    let info = EngineInfo {
        loaded: true,
        playing: true,
        position: Duration::from_secs(42),
        duration: Some(Duration::from_secs(200)),
        generation: 3,
    };

    let stale = info.for_generation(4);
    assert!(!stale.loaded);
    assert_eq!(stale.position, Duration::ZERO);
    assert_eq!(stale.duration, None);
    assert_eq!(stale.generation, 4);

    let current = info.for_generation(3);
    assert_eq!(current.position, Duration::from_secs(42));
    assert_eq!(current.duration, Some(Duration::from_secs(200)));
}
