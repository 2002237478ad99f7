use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::display::format_mmss;

/// Identity of a playlist entry. Never reused within a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

/// Best-effort duration of an entry, filled in by the duration probe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DurationLabel {
    /// The probe has not reported yet.
    #[default]
    Pending,
    Known(Duration),
    /// The probe failed or timed out.
    Unknown,
}

impl DurationLabel {
    pub fn duration(&self) -> Option<Duration> {
        match self {
            DurationLabel::Known(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for DurationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationLabel::Pending => f.write_str("--:--"),
            DurationLabel::Known(d) => f.write_str(&format_mmss(*d)),
            DurationLabel::Unknown => f.write_str("Unknown"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioFile {
    id: EntryId,
    path: PathBuf,
    display_name: String,
    duration: DurationLabel,
}

impl AudioFile {
    pub(crate) fn new(id: EntryId, path: PathBuf) -> Self {
        let display_name = display_name_for(&path);
        Self {
            id,
            path,
            display_name,
            duration: DurationLabel::Pending,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn duration(&self) -> DurationLabel {
        self.duration
    }

    /// Settle the duration label. Only the first resolution of a pending label sticks.
    pub(crate) fn resolve_duration(&mut self, label: DurationLabel) -> bool {
        if self.duration != DurationLabel::Pending || label == DurationLabel::Pending {
            return false;
        }
        self.duration = label;
        true
    }
}

fn display_name_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
