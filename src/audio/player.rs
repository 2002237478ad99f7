use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::PlayerError;

use super::engine::MediaEngine;
use super::thread::spawn_audio_thread;
use super::types::{EngineCmd, EngineHandle, EngineInfo, MediaEvent};

/// `MediaEngine` backed by rodio on a dedicated audio thread.
pub struct RodioEngine {
    tx: Sender<EngineCmd>,
    info: EngineHandle,
    /// Bumped on every `open`; older snapshots are ignored.
    generation: u64,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    /// Start the audio thread. Engine events arrive on the returned receiver.
    pub fn new() -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let (events_tx, events_rx) = mpsc::channel::<MediaEvent>();
        let info: EngineHandle = Arc::new(Mutex::new(EngineInfo::default()));

        let audio_handle = spawn_audio_thread(rx, info.clone(), events_tx);

        let engine = Self {
            tx,
            info,
            generation: 0,
            join: Mutex::new(Some(audio_handle)),
        };
        (engine, events_rx)
    }

    fn send(&self, cmd: EngineCmd) -> Result<(), PlayerError> {
        self.tx.send(cmd).map_err(|_| PlayerError::EngineUnavailable)
    }

    fn snapshot(&self) -> EngineInfo {
        self.info
            .lock()
            .map(|i| i.for_generation(self.generation))
            .unwrap_or_default()
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn shutdown(&self) {
        let _ = self.send(EngineCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaEngine for RodioEngine {
    fn open(&mut self, path: &Path) -> Result<(), PlayerError> {
        self.generation += 1;
        self.send(EngineCmd::Open {
            path: path.to_path_buf(),
            generation: self.generation,
        })?;
        Ok(())
    }

    fn play(&mut self) {
        let _ = self.send(EngineCmd::Play);
    }

    fn pause(&mut self) {
        let _ = self.send(EngineCmd::Pause);
    }

    fn stop(&mut self) {
        let _ = self.send(EngineCmd::Stop);
        if let Ok(mut info) = self.info.lock() {
            info.position = Duration::ZERO;
            info.playing = false;
        }
    }

    fn close(&mut self) {
        let _ = self.send(EngineCmd::Close);
        if let Ok(mut info) = self.info.lock() {
            *info = EngineInfo::default();
        }
    }

    fn position(&self) -> Duration {
        self.snapshot().position
    }

    fn set_position(&mut self, position: Duration) {
        let _ = self.send(EngineCmd::Seek(position));
        if let Ok(mut info) = self.info.lock() {
            info.position = position;
        }
    }

    fn natural_duration(&self) -> Option<Duration> {
        self.snapshot().duration
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(EngineCmd::SetVolume(volume));
    }

    fn set_speed(&mut self, ratio: f32) {
        let _ = self.send(EngineCmd::SetSpeed(ratio));
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
