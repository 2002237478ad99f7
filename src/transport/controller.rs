use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

use crate::audio::{MAX_SPEED, MIN_SPEED, MediaEngine, MediaEvent};
use crate::error::PlayerError;
use crate::library::EntryId;
use crate::playlist::Playlist;

use super::poller::PositionPoller;
use super::state::{PlayMode, PlaybackState, PositionReadout, TransportState};

/// The entry the engine currently has open.
#[derive(Debug, Clone)]
struct Loaded {
    id: EntryId,
    path: PathBuf,
}

/// Play/pause/stop/seek logic in front of a [`MediaEngine`].
///
/// The transport owns the engine. The playlist is passed in per call and
/// `current_index` refers into it by position, so every method tolerates an
/// index that no longer points at an entry.
pub struct Transport<E: MediaEngine> {
    engine: E,
    state: TransportState,
    loaded: Option<Loaded>,
    readout: PositionReadout,
    poller: PositionPoller,
    rng: StdRng,
}

impl<E: MediaEngine> Transport<E> {
    pub fn new(mut engine: E, state: TransportState, poll_period: Duration) -> Self {
        let volume = state.volume.clamp(0.0, 1.0);
        let speed = state.speed.clamp(MIN_SPEED, MAX_SPEED);
        engine.set_volume(volume);
        engine.set_speed(speed);

        Self {
            engine,
            state: TransportState {
                volume,
                speed,
                ..state
            },
            loaded: None,
            readout: PositionReadout::default(),
            poller: PositionPoller::new(poll_period),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the shuffle source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    pub fn readout(&self) -> &PositionReadout {
        &self.readout
    }

    pub fn poller(&self) -> &PositionPoller {
        &self.poller
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Make `index` the current entry without playing it.
    pub fn select(&mut self, index: usize, playlist: &Playlist) {
        if index < playlist.len() {
            self.state.current_index = Some(index);
        }
    }

    /// Make `index` the current entry and play it.
    pub fn play_index(&mut self, index: usize, playlist: &Playlist) -> Result<(), PlayerError> {
        if index >= playlist.len() {
            return Ok(());
        }
        self.state.current_index = Some(index);
        self.play_current(playlist)
    }

    /// Open and play the current entry. No-op when the index is out of range.
    ///
    /// When the engine refuses the file the error is returned and the state is
    /// left as it was.
    pub fn play_current(&mut self, playlist: &Playlist) -> Result<(), PlayerError> {
        let Some(entry) = self.state.current_index.and_then(|i| playlist.get(i)) else {
            return Ok(());
        };
        let path = entry.path().to_path_buf();

        self.engine.open(&path)?;
        self.engine.play();
        info!(path = %path.display(), "playing");

        self.loaded = Some(Loaded { id: entry.id(), path });
        self.state.playback = PlaybackState::Playing;
        self.readout = PositionReadout::default();
        self.poller.start(Instant::now());
        Ok(())
    }

    pub fn toggle_play_pause(&mut self, playlist: &Playlist) -> Result<(), PlayerError> {
        if self.loaded.is_none() {
            if playlist.is_empty() {
                return Ok(());
            }
            if !self.state.current_index.is_some_and(|i| i < playlist.len()) {
                self.state.current_index = Some(0);
            }
            return self.play_current(playlist);
        }

        match self.state.playback {
            PlaybackState::Playing => {
                self.engine.pause();
                self.state.playback = PlaybackState::Paused;
                self.poller.stop();
            }
            PlaybackState::Paused | PlaybackState::Stopped => {
                self.engine.play();
                self.state.playback = PlaybackState::Playing;
                self.poller.start(Instant::now());
            }
        }
        Ok(())
    }

    /// Halt and rewind. The current index is kept.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.state.playback = PlaybackState::Stopped;
        self.poller.stop();
        self.readout.rewind();
    }

    pub fn next(&mut self, playlist: &Playlist) -> Result<(), PlayerError> {
        self.advance(playlist).map(|_| ())
    }

    /// Move forward and play. False when the end was reached without wrapping.
    fn advance(&mut self, playlist: &Playlist) -> Result<bool, PlayerError> {
        let len = playlist.len();
        if len == 0 {
            return Ok(false);
        }

        let target = if self.state.shuffle {
            self.rng.gen_range(0..len)
        } else {
            let candidate = self.state.current_index.map_or(0, |i| i + 1);
            if candidate < len {
                candidate
            } else if self.state.play_mode == PlayMode::RepeatAll {
                0
            } else {
                debug!("end of playlist");
                return Ok(false);
            }
        };

        self.state.current_index = Some(target);
        self.play_current(playlist)?;
        Ok(true)
    }

    /// Move back and play. Wraps from the first entry to the last in every
    /// play mode, unlike `next`.
    pub fn previous(&mut self, playlist: &Playlist) -> Result<(), PlayerError> {
        let len = playlist.len();
        if len == 0 {
            return Ok(());
        }

        let target = if self.state.shuffle {
            self.rng.gen_range(0..len)
        } else {
            match self.state.current_index {
                Some(i) if (1..=len).contains(&i) => i - 1,
                _ => len - 1,
            }
        };

        self.state.current_index = Some(target);
        self.play_current(playlist)
    }

    pub fn on_media_ended(&mut self, playlist: &Playlist) -> Result<(), PlayerError> {
        if self.state.play_mode == PlayMode::RepeatOne && self.loaded.is_some() {
            self.engine.set_position(Duration::ZERO);
            self.engine.play();
            self.readout.rewind();
            return Ok(());
        }

        if !self.advance(playlist)? {
            // The engine sits drained at the end; rewind it so a later play restarts.
            self.stop();
        }
        Ok(())
    }

    pub fn cycle_play_mode(&mut self) -> PlayMode {
        self.state.play_mode = self.state.play_mode.cycled();
        self.state.play_mode
    }

    pub fn set_play_mode(&mut self, mode: PlayMode) {
        self.state.play_mode = mode;
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.state.shuffle = !self.state.shuffle;
        self.state.shuffle
    }

    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;
        self.engine.set_volume(volume);
    }

    pub fn set_speed(&mut self, speed: f32) {
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.state.speed = speed;
        self.engine.set_speed(speed);
    }

    /// The user grabbed the position bar; polling stops moving it.
    pub fn begin_drag(&mut self) {
        self.state.is_dragging = true;
    }

    /// Move the bar under the user's hand. Nothing is sent to the engine.
    pub fn drag_to(&mut self, fraction: f64) {
        if self.state.is_dragging {
            self.readout.percent = fraction.clamp(0.0, 1.0) * 100.0;
        }
    }

    /// The user let go of the position bar: seek to where it was dropped.
    pub fn end_drag(&mut self) {
        if !self.state.is_dragging {
            return;
        }
        self.state.is_dragging = false;
        self.seek(self.readout.fraction());
    }

    /// Jump to `fraction` of the loaded file. Ignored until its length is known.
    pub fn seek(&mut self, fraction: f64) {
        if self.loaded.is_none() {
            return;
        }
        let Some(duration) = self.engine.natural_duration() else {
            return;
        };

        let fraction = fraction.clamp(0.0, 1.0);
        let position = duration.mul_f64(fraction);
        self.engine.set_position(position);
        self.readout = PositionReadout {
            position,
            total: Some(duration),
            percent: fraction * 100.0,
        };
    }

    /// Read position and length from the engine into the readout.
    ///
    /// Does nothing while the user is dragging, when nothing is loaded, or
    /// before the length is known. Returns whether the readout was updated.
    pub fn tick(&mut self) -> bool {
        if self.loaded.is_none() || self.state.is_dragging {
            return false;
        }
        let Some(duration) = self.engine.natural_duration() else {
            return false;
        };

        let position = self.engine.position();
        self.readout.position = position;
        self.readout.total = Some(duration);
        if !duration.is_zero() {
            self.readout.percent =
                (position.as_secs_f64() / duration.as_secs_f64() * 100.0).clamp(0.0, 100.0);
        }
        true
    }

    /// Run a poller tick if one is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.poller.due(now) && self.tick()
    }

    /// React to an engine notification.
    pub fn handle_event(&mut self, event: MediaEvent, playlist: &Playlist) -> Result<(), PlayerError> {
        match event {
            MediaEvent::Opened { duration } => {
                if duration.is_some() {
                    self.readout.total = duration;
                }
                Ok(())
            }
            MediaEvent::Ended => self.on_media_ended(playlist),
            MediaEvent::Failed(reason) => {
                error!(%reason, "media failed");
                // The engine has already dropped the file. Index and mode stay put.
                self.loaded = None;
                self.state.playback = PlaybackState::Stopped;
                self.poller.stop();
                self.readout = PositionReadout::default();
                Err(PlayerError::MediaPlaybackFailed(reason))
            }
        }
    }

    /// Keep `current_index` pointing at the same entry after the entry at
    /// `index` (with id `id`) was removed. Removing the open entry unloads it.
    pub fn on_entry_removed(&mut self, index: usize, id: EntryId) {
        if self.loaded.as_ref().is_some_and(|l| l.id == id) {
            self.unload();
        }
        self.state.current_index = match self.state.current_index {
            Some(c) if c == index => None,
            Some(c) if c > index => Some(c - 1),
            other => other,
        };
    }

    /// Stop, unload and forget the current index. Used when the playlist is cleared.
    pub fn reset(&mut self) {
        self.unload();
        self.state.current_index = None;
        self.state.is_dragging = false;
    }

    /// Stop playback for good; called on exit.
    pub fn shutdown(&mut self) {
        self.unload();
    }

    fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            debug!(path = %loaded.path.display(), "unloading");
        }
        self.engine.stop();
        self.engine.close();
        self.state.playback = PlaybackState::Stopped;
        self.poller.stop();
        self.readout = PositionReadout::default();
    }
}
