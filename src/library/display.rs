use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local};

/// Format a `Duration` as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Size and modification time of a file, as shown in the now-playing panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
}

impl FileInfo {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            size_bytes: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Local>::from),
        })
    }

    pub fn size_label(&self) -> String {
        format!("{:.1} MB", self.size_bytes as f64 / (1024.0 * 1024.0))
    }

    pub fn modified_label(&self) -> String {
        self.modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}
