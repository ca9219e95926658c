//! Background feed polling.
//!
//! A dedicated worker thread owns the application state (settings, feed list,
//! persisted seen/recent state) and runs poll cycles on a timer.  The UI
//! thread talks to it over two [`mpsc`] channels: [`Command`]s in,
//! [`PollMsg`]s out.
//!
//! ## Scheduling
//!
//! The worker blocks on the command channel with a timeout equal to the time
//! left until the next tick; a timeout *is* the tick.  Commands are handled
//! one at a time on the same thread, so a clear or reload that arrives during
//! a cycle takes effect after the cycle finishes.
//!
//! A [`PollGuard`] marks a cycle in progress.  The UI checks it before asking
//! for an immediate check, and the worker refuses to start a second cycle
//! while the guard is held.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::config::{self, FeedConfig, Settings};
use crate::cycle::{self, FeedOutcome};
use crate::notify::{NotificationRequest, Notifier};
use crate::source::FeedSource;
use crate::state::{PersistedState, RecentItem, StateStore};

/// Requests from the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CheckNow,
    Clear,
    Reload,
    TestNotification,
}

/// Messages sent from the worker to the UI thread.
#[derive(Debug, Clone)]
pub enum PollMsg {
    /// The current state, sent after anything changes.
    Snapshot(Snapshot),
    /// Something the user must acknowledge (config problems).
    Alert { title: String, message: String },
    /// A one-line status update.
    Status(String),
}

/// Everything the UI needs to draw itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Newest first.
    pub recent_items: Vec<RecentItem>,
    pub last_check: Option<DateTime<Local>>,
    pub seen_count: usize,
    pub enabled_feeds: usize,
    pub failed_feeds: usize,
}

// ---------------------------------------------------------------------------
// Reentrancy guard
// ---------------------------------------------------------------------------

/// Shared "poll in progress" flag.
#[derive(Debug, Clone, Default)]
pub struct PollGuard(Arc<AtomicBool>);

/// Held for the duration of a cycle; releases the guard on drop.
#[derive(Debug)]
pub struct PollPermit(Arc<AtomicBool>);

impl PollGuard {
    /// Claim the guard, or `None` if a cycle is already running.
    pub fn try_begin(&self) -> Option<PollPermit> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PollPermit(Arc::clone(&self.0)))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for PollPermit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// The poll worker and the application state it owns.
pub struct Worker {
    config_path: PathBuf,
    store: StateStore,
    settings: Settings,
    feeds: Vec<FeedConfig>,
    state: PersistedState,
    last_check: Option<DateTime<Local>>,
    failed_feeds: usize,
    source: Box<dyn FeedSource>,
    notifier: Box<dyn Notifier>,
    guard: PollGuard,
    tx: Sender<PollMsg>,
}

impl Worker {
    /// Load config and persisted state.  Config problems are reported to the
    /// UI as an alert and defaults are used.
    pub fn new(
        config_path: PathBuf,
        store: StateStore,
        source: Box<dyn FeedSource>,
        notifier: Box<dyn Notifier>,
        guard: PollGuard,
        tx: Sender<PollMsg>,
    ) -> Self {
        let mut worker = Self {
            config_path,
            store,
            settings: Settings::default(),
            feeds: Vec::new(),
            state: PersistedState::default(),
            last_check: None,
            failed_feeds: 0,
            source,
            notifier,
            guard,
            tx,
        };
        worker.load_config();
        worker.state = worker.store.load(worker.settings.max_recent_items);
        worker
    }

    /// Read the config file into `settings` and `feeds`.  Returns `false` if
    /// it had to fall back to defaults because of an error.
    fn load_config(&mut self) -> bool {
        let loaded = config::load(&self.config_path);
        self.settings = loaded.config.settings;
        self.feeds = loaded.config.feeds;
        match loaded.error {
            None => true,
            Some(e) => {
                error!(error = %e, "config error; using defaults");
                self.send(PollMsg::Alert {
                    title: "Config Error".into(),
                    message: format!("Could not load config: {e}"),
                });
                false
            }
        }
    }

    /// Run one poll cycle, unless one is already running.
    pub fn check(&mut self) {
        let Some(_permit) = self.guard.try_begin() else {
            info!("poll already in progress; ignoring check request");
            return;
        };
        if self.feeds.is_empty() {
            debug!("no feeds configured; nothing to check");
            self.send(PollMsg::Status("No feeds configured".into()));
            return;
        }

        let report = cycle::run_cycle(
            &self.feeds,
            &mut self.state,
            &self.settings,
            self.source.as_ref(),
            Local::now(),
        );
        self.last_check = Some(report.checked_at);

        for request in &report.notifications {
            self.notifier.notify(request);
        }
        if report.should_persist() {
            self.persist();
        }

        for feed in &report.feeds {
            match &feed.outcome {
                FeedOutcome::Fetched { new_items } => debug!(feed = %feed.name, new_items, "feed ok"),
                FeedOutcome::Failed { reason } => debug!(feed = %feed.name, %reason, "feed skipped"),
            }
        }
        self.failed_feeds = report.failures().count();
        info!(
            feeds = report.feeds.len(),
            failed = self.failed_feeds,
            new_items = report.new_items,
            "poll cycle complete"
        );
        self.send(PollMsg::Status(match report.new_items {
            0 => "No new items".to_string(),
            1 => "1 new item".to_string(),
            n => format!("{n} new items"),
        }));
    }

    /// Forget all seen and recent items.  The UI asks for confirmation first.
    pub fn clear(&mut self) {
        let seen = self.state.seen_items.len();
        let recent = self.state.recent_items.len();
        self.state.clear();
        self.persist();
        info!(seen, recent, "cleared seen data");
        self.notifier.notify(&NotificationRequest::new(
            "Syndi",
            "Data Cleared",
            "All seen and recent items have been cleared.",
        ));
        self.send(PollMsg::Status("Seen data cleared".into()));
    }

    /// Re-read the config file.
    pub fn reload(&mut self) {
        let ok = self.load_config();
        self.state.trim_recent(self.settings.max_recent_items);
        if ok {
            info!("configuration reloaded");
            self.notifier.notify(&NotificationRequest::new(
                "Syndi",
                "Configuration Reloaded",
                "The configuration has been reloaded successfully.",
            ));
            self.send(PollMsg::Status("Configuration reloaded".into()));
        }
    }

    pub fn test_notification(&self) {
        let now = Local::now().format("%H:%M:%S");
        self.notifier.notify(&NotificationRequest::new(
            "Syndi",
            "Test Notification",
            format!("{now} - This is a test notification from Syndi."),
        ));
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            recent_items: self.state.newest_first().cloned().collect(),
            last_check: self.last_check,
            seen_count: self.state.seen_items.len(),
            enabled_feeds: self.feeds.iter().filter(|f| f.enabled).count(),
            failed_feeds: self.failed_feeds,
        }
    }

    #[cfg(test)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.state) {
            error!(error = %e, path = %self.store.path().display(), "could not save poll state");
        }
    }

    /// Send a message to the UI.  Returns `false` once the UI is gone.
    fn send(&self, msg: PollMsg) -> bool {
        self.tx.send(msg).is_ok()
    }

    fn publish(&self) -> bool {
        self.send(PollMsg::Snapshot(self.snapshot()))
    }

    fn handle(&mut self, command: Command) {
        debug!(?command, "handling command");
        match command {
            Command::CheckNow => self.check(),
            Command::Clear => self.clear(),
            Command::Reload => self.reload(),
            Command::TestNotification => self.test_notification(),
        }
    }

    /// Run until the command channel closes or the UI hangs up.
    ///
    /// The first cycle runs immediately; after that one every
    /// `check_interval_seconds`.
    pub fn run(mut self, commands: Receiver<Command>) {
        self.publish();
        self.check();
        let mut next_tick = Instant::now() + self.settings.check_interval();

        loop {
            if !self.publish() {
                debug!("UI receiver dropped; poll worker exiting");
                return;
            }

            let wait = next_tick.saturating_duration_since(Instant::now());
            match commands.recv_timeout(wait) {
                Ok(Command::Reload) => {
                    self.handle(Command::Reload);
                    // Restart the timer with the (possibly new) interval.
                    next_tick = Instant::now() + self.settings.check_interval();
                }
                Ok(command) => self.handle(command),
                Err(RecvTimeoutError::Timeout) => {
                    self.check();
                    next_tick = Instant::now() + self.settings.check_interval();
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("command channel closed; poll worker exiting");
                    return;
                }
            }
        }
    }
}

/// Spawn the worker thread.
///
/// Returns the command sender; drop it to stop the worker.
pub fn spawn(worker: Worker) -> io::Result<Sender<Command>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("syndi-poll".into())
        .spawn(move || worker.run(rx))?;
    Ok(tx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
