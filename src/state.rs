//! Persisted poll state: the seen-identifier set and the recent-items list.
//!
//! Stored as `data.json`:
//!
//! ```json
//! {"seen_items": ["id-1", "https://x/2"], "recent_items": [{"title": "...", "link": "...", "feed_title": "...", "timestamp": "01-02-24 09:30"}]}
//! ```
//!
//! Recent items are kept oldest-first; the UI reverses them for display.

use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::error::DataLoadError;

/// One entry in the recent-items history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentItem {
    pub title: String,
    pub link: String,
    pub feed_title: String,
    /// Pre-formatted `DD-MM-YY HH:MM`.
    #[serde(default)]
    pub timestamp: String,
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, deserialize_with = "seen_from_list")]
    pub seen_items: BTreeSet<String>,
    #[serde(default)]
    pub recent_items: VecDeque<RecentItem>,
}

impl PersistedState {
    pub fn is_seen(&self, id: &str) -> bool {
        self.seen_items.contains(id)
    }

    /// Record `id` as seen.  Returns `true` if it was not seen before.
    pub fn mark_seen(&mut self, id: &str) -> bool {
        if self.seen_items.contains(id) {
            return false;
        }
        self.seen_items.insert(id.to_string())
    }

    /// Append a recent item, evicting the oldest ones beyond `max`.
    pub fn push_recent(&mut self, item: RecentItem, max: usize) {
        self.recent_items.push_back(item);
        self.trim_recent(max);
    }

    /// Drop the oldest recent items until at most `max` remain.
    pub fn trim_recent(&mut self, max: usize) {
        while self.recent_items.len() > max {
            self.recent_items.pop_front();
        }
    }

    /// Forget everything.  The next poll treats every live entry as new.
    pub fn clear(&mut self) {
        self.seen_items.clear();
        self.recent_items.clear();
    }

    /// Recent items, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &RecentItem> {
        self.recent_items.iter().rev()
    }
}

/// Older state files may carry `null` identifiers; skip them instead of
/// rejecting the whole file.
fn seen_from_list<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<String>> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().flatten().collect())
}

/// Reads and writes [`PersistedState`] at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, or an empty state if the file does not exist.
    pub fn try_load(&self) -> Result<PersistedState, DataLoadError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no data file yet; starting fresh");
                return Ok(PersistedState::default());
            }
            Err(source) => {
                return Err(DataLoadError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| DataLoadError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the state, trimmed to `max_recent` recent items.  Any load error
    /// is logged and replaced by an empty state.
    pub fn load(&self, max_recent: usize) -> PersistedState {
        let mut state = self.try_load().unwrap_or_else(|e| {
            warn!(error = %e, "discarding unreadable data file");
            PersistedState::default()
        });
        state.trim_recent(max_recent);
        info!(
            seen = state.seen_items.len(),
            recent = state.recent_items.len(),
            "loaded poll state"
        );
        state
    }

    /// Write the state, replacing the previous file atomically.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let json = serde_json::to_vec(state).context("serializing poll state")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            seen = state.seen_items.len(),
            recent = state.recent_items.len(),
            "saved poll state"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
