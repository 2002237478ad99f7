//! The playlist, the transport and the duration prober, kept consistent.
//!
//! Structural playlist changes go through here so the transport's index is
//! revalidated and probes for departed entries are cancelled.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::audio::{MediaEngine, MediaEvent};
use crate::error::PlayerError;
use crate::library::{AudioFile, DurationProber, EntryId, FileInfo};
use crate::playlist::Playlist;
use crate::transport::Transport;

pub struct Session<E: MediaEngine> {
    pub playlist: Playlist,
    pub transport: Transport<E>,
    prober: DurationProber,
}

impl<E: MediaEngine> Session<E> {
    pub fn new(playlist: Playlist, transport: Transport<E>, prober: DurationProber) -> Self {
        Self {
            playlist,
            transport,
            prober,
        }
    }

    /// Add one file. Missing files are reported as `FileNotFound`.
    pub fn add_file(&mut self, path: &Path) -> Result<EntryId, PlayerError> {
        let id = self.playlist.add(path)?;
        self.prober.request(id, path);
        Ok(id)
    }

    /// Add the audio files under `dir`. Returns how many were added.
    pub fn add_directory(&mut self, dir: &Path, recursive: bool) -> Result<usize, PlayerError> {
        let ids = self.playlist.add_directory(dir, recursive)?;
        self.probe(&ids);
        Ok(ids.len())
    }

    /// Add dropped files and folders. Returns how many entries were added.
    pub fn add_dropped(&mut self, paths: &[PathBuf]) -> usize {
        let ids = self.playlist.add_dropped(paths);
        self.probe(&ids);
        if !ids.is_empty() {
            info!(added = ids.len(), "added dropped paths");
        }
        ids.len()
    }

    fn probe(&mut self, ids: &[EntryId]) {
        for &id in ids {
            if let Some(entry) = self.playlist.position_of(id).and_then(|i| self.playlist.get(i)) {
                self.prober.request(id, entry.path());
            }
        }
    }

    pub fn remove_at(&mut self, index: usize) -> bool {
        let Some(removed) = self.playlist.remove_at(index) else {
            return false;
        };
        self.prober.cancel(removed.id());
        self.transport.on_entry_removed(index, removed.id());
        debug!(path = %removed.path().display(), "removed from playlist");
        true
    }

    /// Empty the playlist; the transport stops and forgets its position.
    pub fn clear(&mut self) {
        let removed = self.playlist.clear();
        self.prober.cancel_all();
        self.transport.reset();
        info!(removed = removed.len(), "playlist cleared");
    }

    /// Apply duration probe results that have arrived. Returns how many were applied.
    pub fn pump_probes(&mut self) -> usize {
        self.prober
            .drain()
            .into_iter()
            .filter(|outcome| self.playlist.resolve_duration(outcome.id, outcome.label))
            .count()
    }

    pub fn pending_probes(&self) -> usize {
        self.prober.pending()
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) -> Result<(), PlayerError> {
        self.transport.handle_event(event, &self.playlist)
    }

    pub fn select(&mut self, index: usize) {
        self.transport.select(index, &self.playlist);
    }

    pub fn play_index(&mut self, index: usize) -> Result<(), PlayerError> {
        self.transport.play_index(index, &self.playlist)
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        self.transport.toggle_play_pause(&self.playlist)
    }

    pub fn next(&mut self) -> Result<(), PlayerError> {
        self.transport.next(&self.playlist)
    }

    pub fn previous(&mut self) -> Result<(), PlayerError> {
        self.transport.previous(&self.playlist)
    }

    pub fn stop(&mut self) {
        self.transport.stop();
    }

    pub fn current_entry(&self) -> Option<&AudioFile> {
        self.transport
            .state()
            .current_index
            .and_then(|i| self.playlist.get(i))
    }

    /// Size and modification time of the current entry, if it can be read.
    pub fn current_file_info(&self) -> Option<FileInfo> {
        let entry = self.current_entry()?;
        match FileInfo::read(entry.path()) {
            Ok(info) => Some(info),
            Err(e) => {
                debug!(path = %entry.path().display(), "file info unavailable: {e}");
                None
            }
        }
    }
}
