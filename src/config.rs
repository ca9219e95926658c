//! Configuration: the feed list, behavioural settings, and on-disk paths.
//!
//! The config document is plain JSON:
//!
//! ```json
//! {
//!   "feeds": [{ "name": "Rust Blog", "url": "https://blog.rust-lang.org/feed.xml", "enabled": true }],
//!   "check_interval_seconds": 300,
//!   "notification_enabled": true,
//!   "show_preview": true,
//!   "max_recent_items": 10
//! }
//! ```
//!
//! Unknown keys are ignored and missing keys take their defaults.  A missing
//! file is not an error; a malformed one is reported back to the caller so the
//! UI can alert the user, and defaults are used in its place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

const DATA_DIR_NAME: &str = ".syndi";
const CONFIG_FILE: &str = "config.json";
const DATA_FILE: &str = "data.json";
const LOG_FILE: &str = "syndi.log";

/// One feed to poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Display name, used as the notification title.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl FeedConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            enabled: true,
        }
    }
}

/// Behavioural settings shared by the poll worker and the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub check_interval_seconds: u64,
    pub notification_enabled: bool,
    pub show_preview: bool,
    pub max_recent_items: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_interval_seconds: 300,
            notification_enabled: true,
            show_preview: true,
            max_recent_items: 10,
        }
    }
}

impl Settings {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds.max(1))
    }
}

/// The full config document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
    #[serde(flatten)]
    pub settings: Settings,
}

impl Config {
    /// Parse a config document.  The interval is clamped to at least one
    /// second.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let mut config: Config = serde_json::from_str(text)?;
        if config.settings.check_interval_seconds == 0 {
            warn!("check_interval_seconds must be at least 1; using 1");
            config.settings.check_interval_seconds = 1;
        }
        Ok(config)
    }

    /// The document written on first launch so there is something to edit.
    pub fn starter() -> Self {
        Self {
            feeds: vec![FeedConfig {
                enabled: false,
                ..FeedConfig::new("Example Feed", "https://example.com/feed.xml")
            }],
            settings: Settings::default(),
        }
    }

    pub fn enabled_feeds(&self) -> usize {
        self.feeds.iter().filter(|f| f.enabled).count()
    }
}

/// Result of [`load`]: always usable, with the error (if any) that forced a
/// fallback to defaults.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub error: Option<ConfigError>,
}

/// Load the config document at `path`.
///
/// Never fails: a missing file yields defaults with an empty feed list, and
/// an unreadable or malformed file yields defaults plus the error.
pub fn load(path: &Path) -> LoadedConfig {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "config file not found; using defaults");
            return LoadedConfig {
                config: Config::default(),
                error: None,
            };
        }
        Err(source) => {
            return LoadedConfig {
                config: Config::default(),
                error: Some(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }),
            };
        }
    };

    match Config::from_json(&text) {
        Ok(config) => {
            info!(
                path = %path.display(),
                feeds = config.feeds.len(),
                enabled = config.enabled_feeds(),
                interval = config.settings.check_interval_seconds,
                "config loaded"
            );
            LoadedConfig {
                config,
                error: None,
            }
        }
        Err(source) => LoadedConfig {
            config: Config::default(),
            error: Some(ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
        },
    }
}

/// Write the starter config to `path` unless a file already exists there.
///
/// Returns `true` if a file was created.
pub fn write_starter(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let json = serde_json::to_string_pretty(&Config::starter())?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "created default config");
    Ok(true)
}

/// Locations of every file Syndi reads or writes.
#[derive(Debug, Clone)]
pub struct Paths {
    pub dir: PathBuf,
    pub config: PathBuf,
    pub data: PathBuf,
    pub log: PathBuf,
}

impl Paths {
    /// Paths rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config: dir.join(CONFIG_FILE),
            data: dir.join(DATA_FILE),
            log: dir.join(LOG_FILE),
            dir,
        }
    }

    /// Resolve the data directory (`override_dir`, else `~/.syndi`) and make
    /// sure it exists.
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match override_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .context("could not determine the home directory")?
                .join(DATA_DIR_NAME),
        };
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        Ok(Self::in_dir(dir))
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_takes_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert!(config.feeds.is_empty());
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.settings.check_interval_seconds, 300);
        assert!(config.settings.notification_enabled);
        assert!(config.settings.show_preview);
        assert_eq!(config.settings.max_recent_items, 10);
    }

    #[test]
    fn parses_feeds_and_settings() {
        let config = Config::from_json(
            r#"{
                "feeds": [
                    {"name": "A", "url": "http://x/feed", "enabled": true},
                    {"name": "B", "url": "http://y/feed", "enabled": false},
                    {"name": "C", "url": "http://z/feed"}
                ],
                "check_interval_seconds": 60,
                "notification_enabled": false,
                "show_preview": false,
                "max_recent_items": 3
            }"#,
        )
        .unwrap();

        assert_eq!(config.feeds.len(), 3);
        assert_eq!(config.feeds[0], FeedConfig::new("A", "http://x/feed"));
        assert!(!config.feeds[1].enabled);
        assert!(config.feeds[2].enabled, "enabled defaults to true");
        assert_eq!(config.enabled_feeds(), 2);
        assert_eq!(config.settings.check_interval_seconds, 60);
        assert!(!config.settings.notification_enabled);
        assert!(!config.settings.show_preview);
        assert_eq!(config.settings.max_recent_items, 3);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config =
            Config::from_json(r#"{"theme": "dark", "feeds": [], "max_recent_items": 4}"#).unwrap();
        assert_eq!(config.settings.max_recent_items, 4);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = Config::from_json(r#"{"check_interval_seconds": 0}"#).unwrap();
        assert_eq!(config.settings.check_interval_seconds, 1);
        assert_eq!(config.settings.check_interval(), Duration::from_secs(1));
    }

    #[test]
    fn negative_interval_is_a_parse_error() {
        assert!(Config::from_json(r#"{"check_interval_seconds": -5}"#).is_err());
    }

    #[test]
    fn load_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("config.json"));
        assert!(loaded.error.is_none());
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    fn load_malformed_file_reports_parse_error_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = load(&path);
        assert!(matches!(loaded.error, Some(ConfigError::Parse { .. })));
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    fn load_reads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"feeds":[{"name":"A","url":"http://x/feed"}]}"#).unwrap();

        let loaded = load(&path);
        assert!(loaded.error.is_none());
        assert_eq!(loaded.config.feeds, vec![FeedConfig::new("A", "http://x/feed")]);
    }

    #[test]
    fn write_starter_only_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(write_starter(&path).unwrap());
        let loaded = load(&path);
        assert!(loaded.error.is_none());
        assert_eq!(loaded.config, Config::starter());
        assert_eq!(loaded.config.enabled_feeds(), 0);

        fs::write(&path, "{}").unwrap();
        assert!(!write_starter(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn paths_resolve_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("profile");
        let paths = Paths::resolve(Some(root.clone())).unwrap();

        assert!(root.is_dir());
        assert_eq!(paths.config, root.join("config.json"));
        assert_eq!(paths.data, root.join("data.json"));
        assert_eq!(paths.log, root.join("syndi.log"));
    }
}
