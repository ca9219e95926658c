//! UI-side application state.
//!
//! The UI owns no feed state of its own: it mirrors the latest [`Snapshot`]
//! from the poll worker and layers selection, status text and modal dialogs
//! on top.

use ratatui::widgets::ListState;

use crate::poll::{PollMsg, Snapshot};
use crate::state::RecentItem;

/// A dialog drawn over the list.  While one is open it captures all keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// "Clear seen data?" with the counts that would be cleared.
    ConfirmClear { seen: usize, recent: usize },
    /// Acknowledge-only message (config errors, about box).
    Alert { title: String, message: String },
}

pub struct App {
    /// Latest state from the worker.
    pub snapshot: Snapshot,
    /// List selection state for scrolling.
    pub list_state: ListState,
    pub modal: Option<Modal>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::default(),
            list_state: ListState::default(),
            modal: None,
            quit: false,
            status: "Starting…".into(),
        }
    }

    /// Fold a message from the poll worker into the UI state.
    pub fn apply(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Snapshot(snapshot) => {
                self.snapshot = snapshot;
                self.clamp_selection();
            }
            PollMsg::Alert { title, message } => {
                self.modal = Some(Modal::Alert { title, message });
            }
            PollMsg::Status(status) => self.status = status,
        }
    }

    pub fn items(&self) -> &[RecentItem] {
        &self.snapshot.recent_items
    }

    pub fn selected_item(&self) -> Option<&RecentItem> {
        self.list_state
            .selected()
            .and_then(|i| self.snapshot.recent_items.get(i))
    }

    /// `Last check: HH:MM:SS`, or `Never` before the first cycle.
    pub fn last_check_label(&self) -> String {
        match self.snapshot.last_check {
            Some(t) => format!("Last check: {}", t.format("%H:%M:%S")),
            None => "Last check: Never".to_string(),
        }
    }

    pub fn request_clear(&mut self) {
        self.modal = Some(Modal::ConfirmClear {
            seen: self.snapshot.seen_count,
            recent: self.snapshot.recent_items.len(),
        });
    }

    pub fn show_about(&mut self) {
        self.modal = Some(Modal::Alert {
            title: "About Syndi".into(),
            message: format!(
                "Syndi - Your simple syndication (RSS) notifier\n\n\
                 Version {}\n\
                 A lightweight feed notifier for RSS and Atom feeds",
                env!("CARGO_PKG_VERSION")
            ),
        });
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    fn clamp_selection(&mut self) {
        let len = self.snapshot.recent_items.len();
        match self.list_state.selected() {
            Some(_) if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.items().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.items().len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.items().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items().is_empty() {
            self.list_state.select(Some(self.items().len() - 1));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    pub fn recent(title: &str) -> RecentItem {
        RecentItem {
            title: title.to_string(),
            link: format!("http://x/{title}"),
            feed_title: "Feed".to_string(),
            timestamp: "01-01-24 10:00".to_string(),
        }
    }

    pub fn app_with(titles: &[&str]) -> App {
        let mut app = App::new();
        app.apply(PollMsg::Snapshot(Snapshot {
            recent_items: titles.iter().map(|t| recent(t)).collect(),
            seen_count: titles.len(),
            enabled_feeds: 1,
            ..Snapshot::default()
        }));
        app
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let app = App::new();
        assert!(app.items().is_empty());
        assert!(!app.quit);
        assert!(app.modal.is_none());
        assert!(app.list_state.selected().is_none());
        assert_eq!(app.last_check_label(), "Last check: Never");
    }

    // -- messages ------------------------------------------------------------

    #[test]
    fn status_and_alert_messages() {
        let mut app = App::new();
        app.apply(PollMsg::Status("2 new items".into()));
        assert_eq!(app.status, "2 new items");

        app.apply(PollMsg::Alert {
            title: "Config Error".into(),
            message: "bad".into(),
        });
        assert!(matches!(app.modal, Some(Modal::Alert { ref title, .. }) if title == "Config Error"));
    }

    #[test]
    fn last_check_label_shows_time() {
        let mut app = App::new();
        app.snapshot.last_check = Some(Local.with_ymd_and_hms(2025, 1, 2, 14, 32, 5).unwrap());
        assert_eq!(app.last_check_label(), "Last check: 14:32:05");
    }

    #[test]
    fn shrinking_snapshot_clamps_selection() {
        let mut app = app_with(&["C", "B", "A"]);
        app.select_last();
        app.apply(PollMsg::Snapshot(Snapshot {
            recent_items: vec![recent("C")],
            ..Snapshot::default()
        }));
        assert_eq!(app.list_state.selected(), Some(0));

        app.apply(PollMsg::Snapshot(Snapshot::default()));
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn request_clear_captures_counts() {
        let mut app = app_with(&["B", "A"]);
        app.snapshot.seen_count = 7;
        app.request_clear();
        assert_eq!(app.modal, Some(Modal::ConfirmClear { seen: 7, recent: 2 }));
        app.close_modal();
        assert!(app.modal.is_none());
    }

    #[test]
    fn selected_item_follows_selection() {
        let mut app = app_with(&["C", "B", "A"]);
        assert!(app.selected_item().is_none());
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_item().map(|i| i.title.as_str()), Some("B"));
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut app = App::new();
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_starts_at_zero_then_advances_and_clamps() {
        let mut app = app_with(&["C", "B", "A"]);

        app.select_next();
        assert_eq!(app.list_state.selected(), Some(0));
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_next();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let mut app = app_with(&["C", "B", "A"]);
        app.select_last();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_first();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
