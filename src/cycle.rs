//! One poll cycle: fetch every enabled feed, keep what is new.
//!
//! [`run_cycle`] is the de-duplication core.  It mutates the
//! [`PersistedState`] it is given and returns a [`CycleReport`]; it does no
//! I/O of its own beyond what the [`FeedSource`] does, and it never fails.
//! A feed that cannot be fetched or parsed is recorded as
//! [`FeedOutcome::Failed`] and the cycle moves on to the next feed.
//!
//! Persisting the state and delivering the notifications is left to the
//! caller (see [`crate::poll`]).

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::{debug, warn};

use crate::config::{FeedConfig, Settings};
use crate::notify::NotificationRequest;
use crate::source::{Entry, FeedSource, ParsedFeed};
use crate::state::{PersistedState, RecentItem};

/// Display format of [`RecentItem::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%y %H:%M";

/// Characters of cleaned summary shown in a notification preview.
pub const PREVIEW_CHARS: usize = 100;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<]+?>").expect("tag pattern is valid"));

/// What happened to one feed during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    Fetched { new_items: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedReport {
    pub name: String,
    pub outcome: FeedOutcome,
}

/// Aggregate result of one cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub checked_at: DateTime<Local>,
    /// One report per enabled feed, in config order.
    pub feeds: Vec<FeedReport>,
    pub new_items: usize,
    /// Empty when notifications are disabled.
    pub notifications: Vec<NotificationRequest>,
}

impl CycleReport {
    /// State only needs writing when something new was recorded.
    pub fn should_persist(&self) -> bool {
        self.new_items > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &FeedReport> {
        self.feeds
            .iter()
            .filter(|f| matches!(f.outcome, FeedOutcome::Failed { .. }))
    }
}

/// Poll every enabled feed once and fold new entries into `state`.
pub fn run_cycle(
    feeds: &[FeedConfig],
    state: &mut PersistedState,
    settings: &Settings,
    source: &dyn FeedSource,
    now: DateTime<Local>,
) -> CycleReport {
    let mut report = CycleReport {
        checked_at: now,
        feeds: Vec::new(),
        new_items: 0,
        notifications: Vec::new(),
    };

    for feed in feeds.iter().filter(|f| f.enabled) {
        let outcome = match source.fetch(feed) {
            Ok(parsed) => {
                let new_items =
                    absorb(feed, &parsed, state, settings, now, &mut report.notifications);
                debug!(feed = %feed.name, entries = parsed.entries.len(), new_items, "feed checked");
                report.new_items += new_items;
                FeedOutcome::Fetched { new_items }
            }
            Err(e) => {
                warn!(feed = %feed.name, url = %feed.url, error = %e, "feed check failed");
                FeedOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        report.feeds.push(FeedReport {
            name: feed.name.clone(),
            outcome,
        });
    }

    report
}

/// Record the unseen entries of one feed.  Returns how many were new.
fn absorb(
    feed: &FeedConfig,
    parsed: &ParsedFeed,
    state: &mut PersistedState,
    settings: &Settings,
    now: DateTime<Local>,
    notifications: &mut Vec<NotificationRequest>,
) -> usize {
    let mut new_items = 0;

    for entry in &parsed.entries {
        if !state.mark_seen(entry.identifier()) {
            continue;
        }
        new_items += 1;

        state.push_recent(
            RecentItem {
                title: entry.display_title().to_string(),
                link: entry.display_link().to_string(),
                feed_title: parsed.display_title().to_string(),
                timestamp: display_timestamp(entry, now),
            },
            settings.max_recent_items,
        );

        if settings.notification_enabled {
            notifications.push(notification_for(feed, entry, settings.show_preview));
        }
    }

    new_items
}

/// `DD-MM-YY HH:MM` for the entry.  Entry times are shown on the UTC clock
/// the feed gives; entries without one get the local `now`.
pub fn display_timestamp(entry: &Entry, now: DateTime<Local>) -> String {
    match entry.timestamp() {
        Some(t) => t.format(TIMESTAMP_FORMAT).to_string(),
        None => now.format(TIMESTAMP_FORMAT).to_string(),
    }
}

/// Feed name as title, entry title as subtitle, and either a preview of the
/// summary or the link as body.
pub fn notification_for(feed: &FeedConfig, entry: &Entry, show_preview: bool) -> NotificationRequest {
    let body = if show_preview {
        preview(entry.summary.as_deref().unwrap_or_default())
    } else {
        entry.display_link().to_string()
    };
    NotificationRequest::new(feed.name.clone(), entry.display_title(), body)
}

/// Strip HTML tags and cut to [`PREVIEW_CHARS`] characters, plus an ellipsis.
pub fn preview(summary: &str) -> String {
    let text = HTML_TAG.replace_all(summary, "");
    let cut: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
