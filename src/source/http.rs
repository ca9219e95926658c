//! HTTP feed source.

use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use tracing::debug;

use super::{parse_feed, FeedSource, ParsedFeed};
use crate::config::FeedConfig;
use crate::error::FeedError;

/// Sent with every request so feed hosts can identify us.
pub const USER_AGENT: &str = "Syndi RSS Notifier";

/// Upper bound on a single feed request, connect through body.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches feeds over HTTP(S) with a blocking [`reqwest`] client.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, FeedError> {
        let client = client_builder().build()?;
        Ok(Self { client })
    }
}

fn client_builder() -> ClientBuilder {
    Client::builder().user_agent(USER_AGENT).timeout(FETCH_TIMEOUT)
}

impl FeedSource for HttpSource {
    fn fetch(&self, feed: &FeedConfig) -> Result<ParsedFeed, FeedError> {
        if feed.url.trim().is_empty() {
            return Err(FeedError::MissingUrl);
        }

        let response = self.client.get(&feed.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.bytes()?;
        debug!(feed = %feed.name, bytes = body.len(), "fetched feed");
        parse_feed(&body)
    }
}
