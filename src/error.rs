//! Error type shared by the playlist, probe, engine and transport layers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// A path handed to the playlist is not an existing file.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A folder handed to the playlist is not an existing directory.
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("could not open {}: {reason}", .path.display())]
    MediaOpenFailed { path: PathBuf, reason: String },

    #[error("media playback failed: {0}")]
    MediaPlaybackFailed(String),

    #[error("could not read duration of {}: {reason}", .path.display())]
    DurationProbeFailed { path: PathBuf, reason: String },

    /// The audio thread has exited and no longer accepts commands.
    #[error("audio engine is not running")]
    EngineUnavailable,
}
