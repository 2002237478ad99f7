//! Transport state types: play mode, playback state and the position readout.

use std::time::Duration;

use crate::config::PlayModeSetting;
use crate::library::format_mmss;

/// The playback state of the transport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What happens at the end of the playlist.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlayMode {
    /// Stop after the last entry.
    #[default]
    Normal,
    /// Wrap around to the first entry.
    RepeatAll,
    /// Replay the current entry when it ends.
    RepeatOne,
}

impl PlayMode {
    /// `Normal -> RepeatAll -> RepeatOne -> Normal`.
    pub fn cycled(self) -> Self {
        match self {
            PlayMode::Normal => PlayMode::RepeatAll,
            PlayMode::RepeatAll => PlayMode::RepeatOne,
            PlayMode::RepeatOne => PlayMode::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayMode::Normal => "Sequential",
            PlayMode::RepeatAll => "Repeat all",
            PlayMode::RepeatOne => "Repeat one",
        }
    }
}

impl From<PlayModeSetting> for PlayMode {
    fn from(setting: PlayModeSetting) -> Self {
        match setting {
            PlayModeSetting::Normal => PlayMode::Normal,
            PlayModeSetting::RepeatAll => PlayMode::RepeatAll,
            PlayModeSetting::RepeatOne => PlayMode::RepeatOne,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    /// Position in the playlist; `None` when nothing is selected.
    pub current_index: Option<usize>,
    pub playback: PlaybackState,
    /// The user is holding the position bar.
    pub is_dragging: bool,
    pub play_mode: PlayMode,
    pub shuffle: bool,
    pub volume: f32,
    pub speed: f32,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            current_index: None,
            playback: PlaybackState::Stopped,
            is_dragging: false,
            play_mode: PlayMode::Normal,
            shuffle: false,
            volume: 0.5,
            speed: 1.0,
        }
    }
}

/// What the position bar and time labels show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionReadout {
    pub position: Duration,
    pub total: Option<Duration>,
    /// Bar fill, `0.0..=100.0`.
    pub percent: f64,
}

impl PositionReadout {
    pub fn fraction(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }

    pub fn position_label(&self) -> String {
        format_mmss(self.position)
    }

    pub fn total_label(&self) -> String {
        format_mmss(self.total.unwrap_or_default())
    }

    pub(super) fn rewind(&mut self) {
        self.position = Duration::ZERO;
        self.percent = 0.0;
    }
}
