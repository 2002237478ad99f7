use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{debug, warn};

use crate::app::{App, PromptKind};
use crate::audio::{MediaEngine, MediaEvent};
use crate::config;
use crate::error::PlayerError;
use crate::library::parse_dropped_paths;
use crate::session::Session;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Where the position bar was drawn last frame.
    pub bar_area: Rect,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Main terminal event loop: applies probe results and engine events, polls
/// the position, draws, and handles input. Returns `Ok(())` on quit.
pub fn run<E: MediaEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session<E>,
    engine_events: &Receiver<MediaEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        session.pump_probes();

        while let Ok(ev) = engine_events.try_recv() {
            let result = session.handle_media_event(ev);
            report(app, result);
        }

        session.transport.poll(Instant::now());

        terminal.draw(|f| state.bar_area = ui::draw(f, app, session, settings))?;

        if event::poll(Duration::from_millis(50))? {
            let quit = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, settings, app, session, state)?
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(mouse, session, state);
                    false
                }
                Event::Paste(text) => {
                    handle_paste(&text, app, session);
                    false
                }
                _ => false,
            };
            if quit {
                break;
            }
        }
    }

    Ok(())
}

/// Surface a failed user action in the error popup.
fn report(app: &mut App, result: Result<(), PlayerError>) {
    if let Err(e) = result {
        warn!("{e}");
        app.show_error(e.to_string());
    }
}

/// Map a terminal column inside the bordered bar `area` to `0.0..=1.0`.
fn fraction_at(area: Rect, column: u16) -> f64 {
    let left = area.x.saturating_add(1);
    let width = area.width.saturating_sub(2);
    if width <= 1 {
        return 0.0;
    }
    let offset = column.saturating_sub(left).min(width - 1);
    f64::from(offset) / f64::from(width - 1)
}

fn in_area(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

fn handle_mouse_event<E: MediaEngine>(
    mouse: MouseEvent,
    session: &mut Session<E>,
    state: &EventLoopState,
) {
    let transport = &mut session.transport;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left)
            if in_area(state.bar_area, mouse.column, mouse.row) =>
        {
            transport.begin_drag();
            transport.drag_to(fraction_at(state.bar_area, mouse.column));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            transport.drag_to(fraction_at(state.bar_area, mouse.column));
        }
        MouseEventKind::Up(MouseButton::Left) => transport.end_drag(),
        _ => {}
    }
}

fn handle_paste<E: MediaEngine>(text: &str, app: &mut App, session: &mut Session<E>) {
    if app.prompt().is_some() {
        app.push_prompt_str(text);
        return;
    }

    let paths = parse_dropped_paths(text);
    debug!(count = paths.len(), "paste received");
    let added = session.add_dropped(&paths);
    app.set_status(format!("Added {added} files"));
}

fn submit_prompt<E: MediaEngine>(
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session<E>,
) {
    let Some((kind, path)) = app.take_prompt() else {
        return;
    };
    let result = match kind {
        PromptKind::File => session.add_file(&path).map(|_| 1),
        PromptKind::Folder => session.add_directory(&path, settings.library.recursive),
    };
    match result {
        Ok(added) => app.set_status(format!("Added {added} files")),
        Err(e) => {
            debug!("{e}");
            app.set_status(e.to_string());
        }
    }
}

fn handle_prompt_key<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session<E>,
) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => submit_prompt(settings, app, session),
        KeyCode::Backspace => app.pop_prompt_char(),
        KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
        _ => {}
    }
}

/// Move the position bar by `delta` of its length, as a complete drag.
fn scrub<E: MediaEngine>(session: &mut Session<E>, delta: f64) {
    let transport = &mut session.transport;
    if !transport.is_loaded() {
        return;
    }
    let target = transport.readout().fraction() + delta;
    transport.begin_drag();
    transport.drag_to(target);
    transport.end_drag();
}

fn handle_key_event<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session<E>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    if app.dismiss_error() {
        return Ok(false);
    }
    if app.prompt().is_some() {
        handle_prompt_key(key, settings, app, session);
        return Ok(false);
    }

    let controls = &settings.controls;
    let len = session.playlist.len();
    let current = session.transport.state().current_index;

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            return Ok(true);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let result = session.toggle_play_pause();
            report(app, result);
        }
        KeyCode::Char('s') => session.stop(),
        KeyCode::Char('l') | KeyCode::Char('n') => {
            let result = session.next();
            report(app, result);
        }
        KeyCode::Char('h') | KeyCode::Char('b') => {
            let result = session.previous();
            report(app, result);
        }
        KeyCode::Enter => {
            if len > 0 {
                let result = session.play_index(current.unwrap_or(0));
                report(app, result);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let target = current.map_or(0, |i| (i + 1).min(len.saturating_sub(1)));
            session.select(target);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let target = current.map_or(0, |i| i.saturating_sub(1));
            session.select(target);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                session.select(0);
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => session.select(len.saturating_sub(1)),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let volume = session.transport.state().volume + f32::from(controls.volume_step) / 100.0;
            session.transport.set_volume(volume);
        }
        KeyCode::Char('-') => {
            let volume = session.transport.state().volume - f32::from(controls.volume_step) / 100.0;
            session.transport.set_volume(volume);
        }
        KeyCode::Char(']') => {
            let speed = session.transport.state().speed + controls.speed_step;
            session.transport.set_speed(speed);
        }
        KeyCode::Char('[') => {
            let speed = session.transport.state().speed - controls.speed_step;
            session.transport.set_speed(speed);
        }
        KeyCode::Char('L') => scrub(session, controls.scrub_percent / 100.0),
        KeyCode::Char('H') => scrub(session, -controls.scrub_percent / 100.0),
        KeyCode::Char('1') => app.tone.adjust_bass(-1),
        KeyCode::Char('2') => app.tone.adjust_bass(1),
        KeyCode::Char('3') => app.tone.adjust_treble(-1),
        KeyCode::Char('4') => app.tone.adjust_treble(1),
        KeyCode::Char('o') => app.open_prompt(PromptKind::File),
        KeyCode::Char('O') => app.open_prompt(PromptKind::Folder),
        KeyCode::Char('C') => {
            session.clear();
            app.set_status("Playlist cleared");
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(i) = current {
                session.remove_at(i);
            }
        }
        KeyCode::Char('m') => {
            let mode = session.transport.cycle_play_mode();
            app.set_status(format!("Mode: {}", mode.label()));
        }
        KeyCode::Char('z') => {
            let on = session.transport.toggle_shuffle();
            app.set_status(if on { "Shuffle on" } else { "Shuffle off" });
        }
        _ => {}
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fake::{Call, FakeEngine};
    use crate::config::{LibrarySettings, Settings};
    use crate::library::DurationProber;
    use crate::playlist::Playlist;
    use crate::transport::{PlaybackState, Transport, TransportState};
    use crossterm::event::KeyModifiers;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn session_with(names: &[&str]) -> (TempDir, Session<FakeEngine>) {
        let dir = tempdir().unwrap();
        let mut session = Session::new(
            Playlist::new(LibrarySettings::default()),
            Transport::new(
                FakeEngine::default(),
                TransportState::default(),
                Duration::from_millis(500),
            ),
            DurationProber::new(Duration::from_secs(5)),
        );
        for name in names {
            let path = dir.path().join(name);
            fs::write(&path, b"x").unwrap();
            session.add_file(&path).unwrap();
        }
        (dir, session)
    }

    fn key(
        code: KeyCode,
        app: &mut App,
        session: &mut Session<FakeEngine>,
        state: &mut EventLoopState,
    ) -> bool {
        handle_key_event(press(code), &Settings::default(), app, session, state).unwrap()
    }

    #[test]
    fn fraction_maps_bar_interior() {
        let area = Rect::new(10, 5, 12, 3);
        assert_eq!(fraction_at(area, 11), 0.0);
        assert_eq!(fraction_at(area, 20), 1.0);
        assert_eq!(fraction_at(area, 0), 0.0);
        assert_eq!(fraction_at(area, 99), 1.0);
        assert!((fraction_at(area, 15) - 4.0 / 9.0).abs() < 1e-9);
        assert_eq!(fraction_at(Rect::new(0, 0, 2, 3), 1), 0.0);
    }

    #[test]
    fn selection_keys_move_current_index() {
        let (_dir, mut session) = session_with(&["a.mp3", "b.mp3", "c.mp3"]);
        let mut app = App::new();
        let mut state = EventLoopState::new();

        key(KeyCode::Char('j'), &mut app, &mut session, &mut state);
        assert_eq!(session.transport.state().current_index, Some(0));
        key(KeyCode::Char('G'), &mut app, &mut session, &mut state);
        assert_eq!(session.transport.state().current_index, Some(2));
        key(KeyCode::Down, &mut app, &mut session, &mut state);
        assert_eq!(session.transport.state().current_index, Some(2));
        key(KeyCode::Char('k'), &mut app, &mut session, &mut state);
        assert_eq!(session.transport.state().current_index, Some(1));
        key(KeyCode::Char('g'), &mut app, &mut session, &mut state);
        key(KeyCode::Char('g'), &mut app, &mut session, &mut state);
        assert_eq!(session.transport.state().current_index, Some(0));
        assert!(session.transport.engine().opened().is_empty());
    }

    #[test]
    fn enter_plays_selected_and_space_pauses() {
        let (_dir, mut session) = session_with(&["a.mp3", "b.mp3"]);
        let mut app = App::new();
        let mut state = EventLoopState::new();

        session.select(1);
        key(KeyCode::Enter, &mut app, &mut session, &mut state);
        assert_eq!(session.transport.state().playback, PlaybackState::Playing);
        assert!(session.transport.engine().opened()[0].ends_with("b.mp3"));

        key(KeyCode::Char(' '), &mut app, &mut session, &mut state);
        assert_eq!(session.transport.state().playback, PlaybackState::Paused);
    }

    #[test]
    fn open_failure_shows_popup_and_next_key_only_dismisses() {
        let (_dir, mut session) = session_with(&["a.mp3"]);
        session.transport.engine_mut().refuse_open = true;
        let mut app = App::new();
        let mut state = EventLoopState::new();

        key(KeyCode::Char('p'), &mut app, &mut session, &mut state);
        assert!(app.error().is_some());
        assert_eq!(session.transport.state().playback, PlaybackState::Stopped);

        assert!(!key(KeyCode::Char('q'), &mut app, &mut session, &mut state));
        assert!(app.error().is_none());
        assert!(key(KeyCode::Char('q'), &mut app, &mut session, &mut state));
    }

    #[test]
    fn volume_and_speed_keys_step_and_clamp() {
        let (_dir, mut session) = session_with(&[]);
        let mut app = App::new();
        let mut state = EventLoopState::new();

        key(KeyCode::Char('+'), &mut app, &mut session, &mut state);
        assert!((session.transport.state().volume - 0.55).abs() < 1e-6);
        for _ in 0..20 {
            key(KeyCode::Char('+'), &mut app, &mut session, &mut state);
        }
        assert_eq!(session.transport.state().volume, 1.0);

        key(KeyCode::Char(']'), &mut app, &mut session, &mut state);
        assert!((session.transport.state().speed - 1.1).abs() < 1e-6);
        assert_eq!(
            session.transport.engine().calls.last(),
            Some(&Call::SetSpeed(session.transport.state().speed))
        );
    }

    #[test]
    fn scrub_key_seeks_when_duration_known() {
        let (_dir, mut session) = session_with(&["a.mp3"]);
        session.transport.engine_mut().duration = Some(Duration::from_secs(100));
        let mut app = App::new();
        let mut state = EventLoopState::new();

        key(KeyCode::Char('L'), &mut app, &mut session, &mut state);
        assert!(!session.transport.engine().calls.iter().any(|c| matches!(c, Call::SetPosition(_))));

        key(KeyCode::Char('p'), &mut app, &mut session, &mut state);
        key(KeyCode::Char('L'), &mut app, &mut session, &mut state);
        assert_eq!(
            session.transport.engine().calls.last(),
            Some(&Call::SetPosition(Duration::from_secs(5)))
        );
        assert!(!session.transport.state().is_dragging);
    }

    #[test]
    fn mouse_drag_on_bar_seeks_on_release() {
        let (_dir, mut session) = session_with(&["a.mp3"]);
        session.transport.engine_mut().duration = Some(Duration::from_secs(90));
        session.toggle_play_pause().unwrap();
        let state = EventLoopState {
            pending_gg: false,
            bar_area: Rect::new(0, 10, 12, 3),
        };
        let mouse = |kind, column| MouseEvent {
            kind,
            column,
            row: 11,
            modifiers: KeyModifiers::NONE,
        };

        handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 1), &mut session, &state);
        assert!(session.transport.state().is_dragging);
        handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10), &mut session, &state);
        let seeks = |s: &Session<FakeEngine>| {
            s.transport
                .engine()
                .calls
                .iter()
                .filter(|c| matches!(c, Call::SetPosition(_)))
                .count()
        };
        assert_eq!(seeks(&session), 0);

        handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 10), &mut session, &state);
        assert!(!session.transport.state().is_dragging);
        assert_eq!(
            session.transport.engine().calls.last(),
            Some(&Call::SetPosition(Duration::from_secs(90)))
        );
    }

    #[test]
    fn paste_goes_to_prompt_when_open() {
        let (dir, mut session) = session_with(&[]);
        fs::write(dir.path().join("x.flac"), b"x").unwrap();
        let mut app = App::new();

        app.open_prompt(PromptKind::File);
        handle_paste("/some/where.mp3", &mut app, &mut session);
        assert_eq!(app.prompt().unwrap().buffer, "/some/where.mp3");
        assert!(session.playlist.is_empty());

        app.cancel_prompt();
        let text = format!("'{}'\n", dir.path().display());
        handle_paste(&text, &mut app, &mut session);
        assert_eq!(session.playlist.len(), 1);
        assert_eq!(app.status.as_deref(), Some("Added 1 files"));
    }

    #[test]
    fn folder_prompt_adds_directory() {
        let (dir, mut session) = session_with(&[]);
        fs::write(dir.path().join("one.mp3"), b"x").unwrap();
        fs::write(dir.path().join("two.wav"), b"x").unwrap();
        let mut app = App::new();
        let mut state = EventLoopState::new();

        key(KeyCode::Char('O'), &mut app, &mut session, &mut state);
        app.push_prompt_str(&dir.path().display().to_string());
        key(KeyCode::Enter, &mut app, &mut session, &mut state);
        assert!(app.prompt().is_none());
        assert_eq!(session.playlist.len(), 2);
    }

    #[test]
    fn clear_and_remove_keys() {
        let (_dir, mut session) = session_with(&["a.mp3", "b.mp3", "c.mp3"]);
        let mut app = App::new();
        let mut state = EventLoopState::new();

        session.select(1);
        key(KeyCode::Char('d'), &mut app, &mut session, &mut state);
        assert_eq!(session.playlist.len(), 2);
        assert_eq!(session.transport.state().current_index, None);

        key(KeyCode::Char('C'), &mut app, &mut session, &mut state);
        assert!(session.playlist.is_empty());
        key(KeyCode::Char(' '), &mut app, &mut session, &mut state);
        assert!(session.transport.engine().opened().is_empty());
    }
}
