use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::LibrarySettings;
use crate::error::PlayerError;
use crate::library::{self, AudioFile, DurationLabel, EntryId};

/// Ordered, index-addressable list of audio files. Insertion order is the
/// playback order when shuffle is off.
pub struct Playlist {
    entries: Vec<AudioFile>,
    next_id: u64,
    library: LibrarySettings,
}

impl Playlist {
    pub fn new(library: LibrarySettings) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            library,
        }
    }

    /// Append the file at `path`. No de-duplication.
    pub fn add(&mut self, path: &Path) -> Result<EntryId, PlayerError> {
        if !path.is_file() {
            return Err(PlayerError::FileNotFound(path.to_path_buf()));
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(AudioFile::new(id, path.to_path_buf()));
        debug!(path = %path.display(), ?id, "added to playlist");
        Ok(id)
    }

    /// Append every allowed audio file under `dir`, in walk order.
    pub fn add_directory(&mut self, dir: &Path, recursive: bool) -> Result<Vec<EntryId>, PlayerError> {
        if !dir.is_dir() {
            return Err(PlayerError::DirectoryNotFound(dir.to_path_buf()));
        }

        let found = library::scan(dir, recursive, &self.library);
        let ids = self.add_all(&found);
        info!(dir = %dir.display(), added = ids.len(), "added folder");
        Ok(ids)
    }

    /// Append dropped files and folders, filtered by extension.
    pub fn add_dropped(&mut self, paths: &[PathBuf]) -> Vec<EntryId> {
        let found = library::expand_dropped(paths, &self.library);
        self.add_all(&found)
    }

    fn add_all(&mut self, paths: &[PathBuf]) -> Vec<EntryId> {
        paths
            .iter()
            .filter_map(|p| match self.add(p) {
                Ok(id) => Some(id),
                Err(e) => {
                    debug!("{e}");
                    None
                }
            })
            .collect()
    }

    /// Remove the entry at `index`. Indices after it shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Option<AudioFile> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Remove every entry, returning their ids.
    pub fn clear(&mut self) -> Vec<EntryId> {
        self.entries.drain(..).map(|e| e.id()).collect()
    }

    /// Settle the duration of entry `id`. False when the entry is gone.
    pub fn resolve_duration(&mut self, id: EntryId, label: DurationLabel) -> bool {
        match self.entries.iter_mut().find(|e| e.id() == id) {
            Some(entry) => entry.resolve_duration(label),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AudioFile> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioFile> {
        self.entries.iter()
    }

    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }
}
