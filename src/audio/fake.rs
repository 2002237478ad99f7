//! Recording `MediaEngine` used by unit tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PlayerError;

use super::engine::MediaEngine;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(PathBuf),
    Play,
    Pause,
    Stop,
    Close,
    SetPosition(Duration),
    SetVolume(f32),
    SetSpeed(f32),
}

#[derive(Debug, Default)]
pub struct FakeEngine {
    pub calls: Vec<Call>,
    pub position: Duration,
    pub duration: Option<Duration>,
    /// When set, `open` refuses every file.
    pub refuse_open: bool,
}

impl FakeEngine {
    pub fn opened(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Open(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }
}

impl MediaEngine for FakeEngine {
    fn open(&mut self, path: &Path) -> Result<(), PlayerError> {
        if self.refuse_open {
            return Err(PlayerError::MediaOpenFailed {
                path: path.to_path_buf(),
                reason: "refused".to_string(),
            });
        }
        self.calls.push(Call::Open(path.to_path_buf()));
        Ok(())
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
    }

    fn close(&mut self) {
        self.calls.push(Call::Close);
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn set_position(&mut self, position: Duration) {
        self.calls.push(Call::SetPosition(position));
    }

    fn natural_duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::SetVolume(volume));
    }

    fn set_speed(&mut self, ratio: f32) {
        self.calls.push(Call::SetSpeed(ratio));
    }
}
