use std::path::PathBuf;
use std::time::Duration;

use crate::audio::MediaEngine;
use crate::config;
use crate::library::parse_dropped_paths;
use crate::session::Session;
use crate::transport::TransportState;

/// Transport state at launch: play mode, shuffle and levels from settings.
pub fn initial_transport_state(settings: &config::Settings) -> TransportState {
    TransportState {
        play_mode: settings.playback.play_mode.into(),
        shuffle: settings.playback.shuffle,
        volume: settings.audio.volume,
        speed: settings.audio.speed,
        ..TransportState::default()
    }
}

pub fn poll_period(settings: &config::Settings) -> Duration {
    Duration::from_millis(settings.audio.poll_interval_ms)
}

pub fn probe_timeout(settings: &config::Settings) -> Duration {
    Duration::from_millis(settings.audio.probe_timeout_ms)
}

/// Command-line arguments are treated like a drop. A single argument may
/// also be a pasted list (e.g. `file://` URIs).
pub fn initial_paths(args: impl IntoIterator<Item = String>) -> Vec<PathBuf> {
    args.into_iter()
        .flat_map(|arg| {
            if arg.starts_with("file://") || arg.contains('\n') {
                parse_dropped_paths(&arg)
            } else {
                vec![PathBuf::from(arg)]
            }
        })
        .collect()
}

/// Load the launch paths and select the first entry so space plays it.
pub fn load_initial_paths<E: MediaEngine>(session: &mut Session<E>, paths: &[PathBuf]) -> usize {
    if paths.is_empty() {
        return 0;
    }
    let added = session.add_dropped(paths);
    if added > 0 {
        session.select(0);
    }
    added
}
