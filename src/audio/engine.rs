use std::path::Path;
use std::time::Duration;

use crate::error::PlayerError;

/// The media engine boundary.
///
/// The engine decodes and outputs one file at a time. Commands return
/// immediately; outcomes such as a failed open or the end of the file are
/// reported later as [`MediaEvent`](super::MediaEvent)s.
pub trait MediaEngine {
    /// Load `path`, replacing whatever was loaded. Position and duration
    /// readings of the previous file are invalid from here on.
    fn open(&mut self, path: &Path) -> Result<(), PlayerError>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Halt and rewind; the file stays loaded.
    fn stop(&mut self);
    /// Unload the file.
    fn close(&mut self);

    fn position(&self) -> Duration;
    fn set_position(&mut self, position: Duration);
    /// Length of the loaded file, `None` until known.
    fn natural_duration(&self) -> Option<Duration>;

    /// `volume` is in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
    /// `ratio` is in `MIN_SPEED..=MAX_SPEED`.
    fn set_speed(&mut self, ratio: f32);
}
