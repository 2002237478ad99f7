//! Audio files on disk: the playlist record, directory scanning, dropped
//! path handling and the duration probe.

mod display;
mod dropped;
mod model;
mod probe;
mod scan;

pub use display::{FileInfo, format_mmss};
pub use dropped::{expand_dropped, parse_dropped_paths};
pub use model::{AudioFile, DurationLabel, EntryId};
pub use probe::{DurationProber, ProbeOutcome, read_duration};
pub use scan::scan;
