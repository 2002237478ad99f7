use std::env;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::RodioEngine;
use crate::library::DurationProber;
use crate::playlist::Playlist;
use crate::session::Session;
use crate::transport::Transport;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    // Keep the guard alive until the terminal is restored so late events are flushed.
    let _log_guard = match logging::init_logging(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("legato: logging disabled: {e}");
            None
        }
    };

    let (engine, engine_events) = RodioEngine::new();
    let transport = Transport::new(
        engine,
        startup::initial_transport_state(&settings),
        startup::poll_period(&settings),
    );
    let playlist = Playlist::new(settings.library.clone());
    let prober = DurationProber::new(startup::probe_timeout(&settings));
    let mut session = Session::new(playlist, transport, prober);
    let mut app = App::new();

    let paths = startup::initial_paths(env::args().skip(1));
    let added = startup::load_initial_paths(&mut session, &paths);
    if !paths.is_empty() {
        app.set_status(format!("Added {added} files"));
    }
    info!(added, "starting");

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut session,
            &engine_events,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    session.transport.shutdown();
    info!("shut down");

    run_result
}
