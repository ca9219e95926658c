//! RSS 2.0 parsing.
//!
//! Uses the [`rss`] crate.  Documents it rejects (Atom, RSS 1.0) are handed
//! to [`super::atom`] by [`super::parse_feed`].

use chrono::{DateTime, Utc};

use super::feed_item::non_empty;
use super::{Entry, ParsedFeed};

/// Parse raw bytes as an RSS 2.0 channel.
pub fn parse_bytes(body: &[u8]) -> Result<ParsedFeed, rss::Error> {
    let channel = rss::Channel::read_from(body)?;
    Ok(parse_channel(&channel))
}

/// Convert an already-parsed [`rss::Channel`] into a [`ParsedFeed`].
///
/// Pure function, so tests can exercise it without the network.
pub fn parse_channel(channel: &rss::Channel) -> ParsedFeed {
    let entries = channel
        .items()
        .iter()
        .map(|item| {
            // <pubDate> is RFC 2822; dc:date (if any) is ISO 8601.
            let published = item
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
                .map(|dt| dt.with_timezone(&Utc));

            let updated = item
                .dublin_core_ext()
                .and_then(|dc| dc.dates().first())
                .and_then(|d| DateTime::parse_from_rfc3339(d.trim()).ok())
                .map(|dt| dt.with_timezone(&Utc));

            Entry {
                id: non_empty(item.guid().map(|g| g.value())),
                link: non_empty(item.link()),
                title: non_empty(item.title()),
                summary: non_empty(item.description().or(item.content())),
                published,
                updated,
            }
        })
        .collect();

    ParsedFeed {
        title: non_empty(Some(channel.title())),
        entries,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_channel_extracts_items() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>First Post</title>
      <link>https://example.com/1</link>
      <guid>guid-1</guid>
      <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
      <description>First description</description>
    </item>
    <item>
      <title>Second Post</title>
      <link>https://example.com/2</link>
      <guid>guid-2</guid>
      <pubDate>Tue, 02 Jan 2024 12:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

        let feed = parse_bytes(xml.as_bytes()).unwrap();

        assert_eq!(feed.title.as_deref(), Some("Test Feed"));
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.identifier(), "guid-1");
        assert_eq!(first.display_title(), "First Post");
        assert_eq!(first.link.as_deref(), Some("https://example.com/1"));
        assert_eq!(first.summary.as_deref(), Some("First description"));
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );

        assert_eq!(feed.entries[1].identifier(), "guid-2");
        assert!(feed.entries[1].summary.is_none());
    }

    #[test]
    fn falls_back_to_link_when_no_guid() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <item>
      <title>No GUID</title>
      <link>https://example.com/no-guid</link>
    </item>
  </channel>
</rss>"#;

        let feed = parse_bytes(xml.as_bytes()).unwrap();
        assert!(feed.entries[0].id.is_none());
        assert_eq!(feed.entries[0].identifier(), "https://example.com/no-guid");
    }

    #[test]
    fn handles_missing_title() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <item>
      <guid>g1</guid>
    </item>
  </channel>
</rss>"#;

        let feed = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(feed.entries[0].display_title(), "No title");
    }

    #[test]
    fn handles_invalid_date() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <item>
      <guid>g1</guid>
      <title>Bad Date</title>
      <pubDate>not-a-real-date</pubDate>
    </item>
  </channel>
</rss>"#;

        let feed = parse_bytes(xml.as_bytes()).unwrap();
        assert!(feed.entries[0].published.is_none());
        assert!(feed.entries[0].timestamp().is_none());
    }

    #[test]
    fn dublin_core_date_fills_updated() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Test</title>
    <item>
      <guid>g1</guid>
      <dc:date>2024-03-05T10:15:00Z</dc:date>
    </item>
  </channel>
</rss>"#;

        let feed = parse_bytes(xml.as_bytes()).unwrap();
        assert!(feed.entries[0].published.is_none());
        assert_eq!(
            feed.entries[0].timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn rejects_atom_documents() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"><title>A</title></feed>"#;
        assert!(parse_bytes(xml.as_bytes()).is_err());
    }
}
