//! Audio-related small types and handles.
//!
//! This module defines the commands accepted by the audio thread, the events
//! it emits and the playback snapshot it shares with the UI.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Slowest playback speed the engine accepts.
pub const MIN_SPEED: f32 = 0.25;
/// Fastest playback speed the engine accepts.
pub const MAX_SPEED: f32 = 4.0;

#[derive(Debug)]
pub enum EngineCmd {
    /// Load a file and prepare it paused at the start. Snapshots published
    /// from here on carry `generation`.
    Open { path: PathBuf, generation: u64 },
    Play,
    Pause,
    /// Halt playback and rewind to the start, keeping the file loaded.
    Stop,
    /// Unload the current file.
    Close,
    /// Jump to an absolute position in the current file.
    Seek(Duration),
    SetVolume(f32),
    SetSpeed(f32),
    /// Stop everything and end the audio thread.
    Quit,
}

/// Notifications from the engine, delivered on the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The file opened; `duration` is its length when the decoder knows it.
    Opened { duration: Option<Duration> },
    /// The current file played to its end.
    Ended,
    /// Opening or playing the current file failed.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
/// Playback snapshot published by the audio thread.
pub struct EngineInfo {
    /// Whether a file is loaded.
    pub loaded: bool,
    /// Whether the loaded file is audibly playing.
    pub playing: bool,
    /// Current position in the loaded file.
    pub position: Duration,
    /// Length of the loaded file, if known.
    pub duration: Option<Duration>,
    /// The `Open` this snapshot describes.
    pub generation: u64,
}

impl EngineInfo {
    /// The snapshot as seen after open number `generation`. Readings left
    /// over from an earlier file come back empty.
    pub fn for_generation(&self, generation: u64) -> EngineInfo {
        if self.generation == generation {
            self.clone()
        } else {
            EngineInfo {
                generation,
                ..EngineInfo::default()
            }
        }
    }
}

pub type EngineHandle = Arc<Mutex<EngineInfo>>;
