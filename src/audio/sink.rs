//! Utilities for creating `rodio` sinks from file paths.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlayerError;
use crate::library::read_duration;

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Also returns the file's length, from the decoder when it knows it and from
/// the container metadata otherwise.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), PlayerError> {
    let open_failed = |reason: String| PlayerError::MediaOpenFailed {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| open_failed(e.to_string()))?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| open_failed(e.to_string()))?;

    let duration = decoder
        .total_duration()
        .or_else(|| read_duration(path).ok());

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}
