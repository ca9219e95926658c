//! Error taxonomy.
//!
//! None of these errors is fatal to the process.  Config errors fall back to
//! defaults (and are surfaced to the user), data errors reset the persisted
//! state, and feed errors skip a single feed for a single cycle.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The configuration document could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The persisted seen/recent state could not be loaded.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A single feed could not be fetched or parsed during a poll cycle.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed has no url configured")]
    MissingUrl,

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Http(String),

    #[error("server answered HTTP {0}")]
    Status(u16),

    #[error("could not parse feed: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else if let Some(status) = err.status() {
            FeedError::Status(status.as_u16())
        } else {
            FeedError::Http(err.to_string())
        }
    }
}
