//! Asynchronous duration probe.
//!
//! Probes run off the UI thread: a dispatcher thread takes jobs in request
//! order and runs each on its own probe thread, waiting at most `timeout` for
//! lofty to finish reading the container headers. Outcomes come back over a
//! channel and are applied by whoever owns the playlist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use lofty::file::AudioFile as _;
use tracing::{debug, warn};

use crate::error::PlayerError;

use super::model::{DurationLabel, EntryId};

/// Read the playing time of `path` from its container metadata.
pub fn read_duration(path: &Path) -> Result<Duration, PlayerError> {
    let tagged = lofty::read_from_path(path).map_err(|e| PlayerError::DurationProbeFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let duration = tagged.properties().duration();
    if duration.is_zero() {
        return Err(PlayerError::DurationProbeFailed {
            path: path.to_path_buf(),
            reason: "container reports no duration".to_string(),
        });
    }
    Ok(duration)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub id: EntryId,
    pub label: DurationLabel,
}

struct ProbeJob {
    id: EntryId,
    path: PathBuf,
    cancelled: Arc<AtomicBool>,
}

pub struct DurationProber {
    jobs: Sender<ProbeJob>,
    outcomes: Receiver<ProbeOutcome>,
    pending: HashMap<EntryId, Arc<AtomicBool>>,
}

impl DurationProber {
    pub fn new(timeout: Duration) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel::<ProbeJob>();
        let (outcomes_tx, outcomes_rx) = mpsc::channel::<ProbeOutcome>();

        thread::spawn(move || dispatch(jobs_rx, outcomes_tx, timeout));

        Self {
            jobs: jobs_tx,
            outcomes: outcomes_rx,
            pending: HashMap::new(),
        }
    }

    /// Queue a probe for entry `id`.
    pub fn request(&mut self, id: EntryId, path: &Path) {
        let cancelled = Arc::new(AtomicBool::new(false));
        let job = ProbeJob {
            id,
            path: path.to_path_buf(),
            cancelled: cancelled.clone(),
        };
        if self.jobs.send(job).is_err() {
            warn!(path = %path.display(), "duration probe dispatcher is gone");
            return;
        }
        self.pending.insert(id, cancelled);
    }

    /// Drop interest in the probe for `id`; its outcome will not be delivered.
    pub fn cancel(&mut self, id: EntryId) {
        if let Some(flag) = self.pending.remove(&id) {
            flag.store(true, Ordering::Relaxed);
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, flag) in self.pending.drain() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Number of probes requested and neither delivered nor cancelled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Collect the outcomes that have arrived since the last call. Never blocks.
    pub fn drain(&mut self) -> Vec<ProbeOutcome> {
        let mut ready = Vec::new();
        while let Ok(outcome) = self.outcomes.try_recv() {
            // A cancelled probe may already have been in flight.
            if self.pending.remove(&outcome.id).is_some() {
                ready.push(outcome);
            }
        }
        ready
    }
}

impl Drop for DurationProber {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn dispatch(jobs: Receiver<ProbeJob>, outcomes: Sender<ProbeOutcome>, timeout: Duration) {
    for job in jobs {
        if job.cancelled.load(Ordering::Relaxed) {
            continue;
        }

        let (tx, rx) = mpsc::channel();
        let path = job.path.clone();
        thread::spawn(move || {
            let _ = tx.send(read_duration(&path));
        });

        let label = match rx.recv_timeout(timeout) {
            Ok(Ok(duration)) => DurationLabel::Known(duration),
            Ok(Err(e)) => {
                debug!("{e}");
                DurationLabel::Unknown
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(path = %job.path.display(), ?timeout, "duration probe timed out");
                DurationLabel::Unknown
            }
            Err(RecvTimeoutError::Disconnected) => DurationLabel::Unknown,
        };

        if job.cancelled.load(Ordering::Relaxed) {
            continue;
        }
        if outcomes.send(ProbeOutcome { id: job.id, label }).is_err() {
            break;
        }
    }
}
