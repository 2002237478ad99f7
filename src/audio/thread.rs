use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use super::sink::create_sink_at;
use super::types::{EngineCmd, EngineHandle, MediaEvent};

/// How often the thread checks for end of file and republishes its position.
const TICK: Duration = Duration::from_millis(100);

struct Loaded {
    path: PathBuf,
    sink: Sink,
    duration: Option<Duration>,
    /// Where the current sink started; `Sink::get_pos` counts from here.
    offset: Duration,
    ended: bool,
}

struct AudioThread {
    stream: OutputStream,
    current: Option<Loaded>,
    volume: f32,
    speed: f32,
    /// Generation of the last `Open`, stamped on every published snapshot.
    generation: u64,
    info: EngineHandle,
    events: Sender<MediaEvent>,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<EngineCmd>,
    info: EngineHandle,
    events: Sender<MediaEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                error!("no audio output device: {e}");
                drain_without_device(rx, &events, &e.to_string());
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut audio = AudioThread {
            stream,
            current: None,
            volume: 1.0,
            speed: 1.0,
            generation: 0,
            info,
            events,
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(EngineCmd::Quit) => {
                    audio.close();
                    audio.publish();
                    break;
                }
                Ok(cmd) => audio.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            audio.check_ended();
            audio.publish();
        }
        debug!("audio thread finished");
    })
}

/// Without an output device every open fails; keep saying so until told to quit.
fn drain_without_device(rx: Receiver<EngineCmd>, events: &Sender<MediaEvent>, reason: &str) {
    for cmd in rx {
        match cmd {
            EngineCmd::Open { .. } => {
                let _ = events.send(MediaEvent::Failed(format!(
                    "no audio output device: {reason}"
                )));
            }
            EngineCmd::Quit => break,
            _ => {}
        }
    }
}

impl AudioThread {
    fn handle(&mut self, cmd: EngineCmd) {
        match cmd {
            EngineCmd::Open { path, generation } => {
                self.generation = generation;
                self.open(path);
            }
            EngineCmd::Play => {
                if let Some(c) = self.current.as_ref() {
                    c.sink.play();
                }
            }
            EngineCmd::Pause => {
                if let Some(c) = self.current.as_ref() {
                    c.sink.pause();
                }
            }
            EngineCmd::Stop => self.rebuild_at(Duration::ZERO, false),
            EngineCmd::Close => self.close(),
            EngineCmd::Seek(position) => {
                // A drained sink is not paused either; only a playing one resumes.
                let resume = self
                    .current
                    .as_ref()
                    .is_some_and(|c| !c.ended && !c.sink.is_paused());
                self.rebuild_at(position, resume);
            }
            EngineCmd::SetVolume(volume) => {
                self.volume = volume;
                if let Some(c) = self.current.as_ref() {
                    c.sink.set_volume(volume);
                }
            }
            EngineCmd::SetSpeed(speed) => {
                self.speed = speed;
                if let Some(c) = self.current.as_ref() {
                    c.sink.set_speed(speed);
                }
            }
            EngineCmd::Quit => {}
        }
    }

    fn open(&mut self, path: PathBuf) {
        self.close();

        match create_sink_at(&self.stream, &path, Duration::ZERO) {
            Ok((sink, duration)) => {
                sink.set_volume(self.volume);
                sink.set_speed(self.speed);
                debug!(path = %path.display(), ?duration, "opened");
                self.current = Some(Loaded {
                    path,
                    sink,
                    duration,
                    offset: Duration::ZERO,
                    ended: false,
                });
                let _ = self.events.send(MediaEvent::Opened { duration });
            }
            Err(e) => {
                warn!("{e}");
                let _ = self.events.send(MediaEvent::Failed(e.to_string()));
            }
        }
    }

    /// Replace the current sink with a fresh one starting at `position`.
    ///
    /// Used for both seeking and stopping: a drained sink cannot be rewound,
    /// so the file is decoded again and skipped forward.
    fn rebuild_at(&mut self, position: Duration, resume: bool) {
        let Some(path) = self.current.as_ref().map(|c| c.path.clone()) else {
            return;
        };

        match create_sink_at(&self.stream, &path, position) {
            Ok((sink, _)) => {
                sink.set_volume(self.volume);
                sink.set_speed(self.speed);
                if resume {
                    sink.play();
                }
                if let Some(c) = self.current.as_mut() {
                    c.sink.stop();
                    c.sink = sink;
                    c.offset = position;
                    c.ended = false;
                }
            }
            Err(e) => {
                warn!("{e}");
                self.close();
                let _ = self.events.send(MediaEvent::Failed(e.to_string()));
            }
        }
    }

    fn close(&mut self) {
        if let Some(c) = self.current.take() {
            c.sink.stop();
        }
    }

    fn check_ended(&mut self) {
        let Some(c) = self.current.as_mut() else {
            return;
        };
        if !c.ended && !c.sink.is_paused() && c.sink.empty() {
            c.ended = true;
            let _ = self.events.send(MediaEvent::Ended);
        }
    }

    fn publish(&self) {
        let Ok(mut info) = self.info.lock() else {
            return;
        };
        match self.current.as_ref() {
            Some(c) => {
                let mut position = c.offset + c.sink.get_pos();
                if let Some(d) = c.duration {
                    position = position.min(d);
                }
                info.loaded = true;
                info.playing = !c.sink.is_paused() && !c.sink.empty();
                info.position = position;
                info.duration = c.duration;
            }
            None => *info = Default::default(),
        }
        info.generation = self.generation;
    }
}
