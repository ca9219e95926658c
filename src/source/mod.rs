//! Feed sources: fetching and parsing.
//!
//! The poll cycle only sees the [`FeedSource`] trait.  [`HttpSource`] is the
//! real implementation; tests substitute in-memory fakes.
//!
//! Parsing tries RSS 2.0 first ([`rss`]) and falls back to the generic
//! `feed-rs` parser ([`atom`]) for Atom and other formats.

mod atom;
mod feed_item;
mod http;
mod rss;

pub use feed_item::{Entry, ParsedFeed};
pub use http::HttpSource;

use crate::config::FeedConfig;
use crate::error::FeedError;

/// Anything that can produce a parsed feed for a configured feed.
///
/// The poll worker calls [`fetch()`](FeedSource::fetch) once per enabled feed
/// per cycle, on its own thread, so implementations must be [`Send`].
pub trait FeedSource: Send {
    fn fetch(&self, feed: &FeedConfig) -> Result<ParsedFeed, FeedError>;
}

/// Parse a fetched document as RSS 2.0, or failing that, as Atom.
pub fn parse_feed(body: &[u8]) -> Result<ParsedFeed, FeedError> {
    match rss::parse_bytes(body) {
        Ok(feed) => Ok(feed),
        Err(rss_err) => atom::parse_bytes(body).map_err(|atom_err| {
            FeedError::Parse(format!("not RSS ({rss_err}) and not Atom ({atom_err})"))
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
