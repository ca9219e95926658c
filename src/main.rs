//! syndi — a simple syndication notifier.
//!
//! Polls RSS/Atom feeds on an interval and raises a desktop notification for
//! every entry it has not seen before.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  PollMsg   ┌──────────┐  draw()  ┌──────────┐
//! │  poll.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread) │ ◄───────── │ (state)  │          │ (render) │
//! └──────────┘  Command   └──────────┘          └──────────┘
//!      │                       ▲
//!      │ run_cycle()           │ handle_key_event()
//! ┌──────────┐            ┌──────────┐
//! │ cycle.rs │            │ input.rs │
//! └──────────┘            └──────────┘
//! ```
//!
//! * **`config`** — feed list, settings and file locations.
//! * **`source/`** — the `FeedSource` trait, HTTP fetching, RSS/Atom parsing.
//! * **`cycle`** — one poll cycle: de-duplication and recent-items upkeep.
//! * **`state`** — the persisted seen set and recent items.
//! * **`poll`** — the worker thread that owns all of the above.
//! * **`notify`** — desktop notification delivery.
//! * **`app`** / **`ui`** / **`input`** — the terminal front end.

mod app;
mod config;
mod cycle;
mod error;
mod input;
mod notify;
mod poll;
mod source;
mod state;
mod ui;
mod util;

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Paths;
use input::Action;
use notify::DesktopNotifier;
use poll::{Command, PollGuard, Worker};
use source::HttpSource;
use state::StateStore;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Log to `syndi.log` in the data directory; the terminal belongs to the UI.
/// Falls back to stderr if the file cannot be opened.
fn init_logging(paths: &Paths) {
    let env_filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %paths.log.display(), "logging initialized");
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(io::stderr)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // -- locate files --------------------------------------------------------
    let data_dir = std::env::args_os().nth(1).map(PathBuf::from);
    let paths = Paths::resolve(data_dir)?;

    init_logging(&paths);
    tracing::info!(dir = %paths.dir.display(), "syndi starting");

    if let Err(e) = config::write_starter(&paths.config) {
        tracing::warn!(error = %e, "could not write default config");
    }

    // -- start the poll worker -----------------------------------------------
    let (msg_tx, msg_rx) = mpsc::channel();
    let guard = PollGuard::default();
    let source = HttpSource::new().context("building HTTP client")?;
    let worker = Worker::new(
        paths.config.clone(),
        StateStore::new(&paths.data),
        Box::new(source),
        Box::new(DesktopNotifier),
        guard.clone(),
        msg_tx,
    );
    let commands = poll::spawn(worker).context("starting poll worker")?;

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    install_panic_hook();
    let mut terminal = TerminalGuard::new()?;
    let mut app = App::new();

    // -- main event loop -----------------------------------------------------
    // ~10 fps: drain worker messages, render, then wait up to one tick for a
    // key.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = msg_rx.try_recv() {
            app.apply(msg);
        }

        terminal.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = input::handle_key_event(&mut app, key) {
                    dispatch(action, &mut app, &guard, &commands, &paths);
                }
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("syndi exiting");
    Ok(())
}

/// Carry out a keypress's side effect.
fn dispatch(
    action: Action,
    app: &mut App,
    guard: &PollGuard,
    commands: &mpsc::Sender<Command>,
    paths: &Paths,
) {
    let command = match action {
        Action::CheckNow if guard.is_busy() => {
            tracing::info!("check requested while a poll is running; ignored");
            app.status = "Check already in progress".into();
            return;
        }
        Action::CheckNow => {
            app.status = "Checking…".into();
            Command::CheckNow
        }
        Action::ClearSeenData => Command::Clear,
        Action::ReloadConfig => Command::Reload,
        Action::TestNotification => Command::TestNotification,
        Action::OpenConfig => {
            util::open_config(&paths.config);
            return;
        }
        Action::OpenLink(link) => {
            util::open_url(&link);
            return;
        }
    };

    if commands.send(command).is_err() {
        tracing::error!(?command, "poll worker is gone");
        app.status = "Poll worker stopped; see syndi.log".into();
    }
}
