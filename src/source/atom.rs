//! Atom (and everything else `feed-rs` understands) parsing.

use feed_rs::model;
use feed_rs::parser::{Builder, ParseFeedError};

use super::feed_item::non_empty;
use super::{Entry, ParsedFeed};

/// Parse raw bytes with `feed-rs`.
///
/// `feed-rs` normally invents an id (a hash of link and title) for entries
/// that lack one.  Those would never match the link-based identifiers already
/// in the seen set, so missing ids stay empty and [`Entry::identifier`] falls
/// back to the link.
pub fn parse_bytes(body: &[u8]) -> Result<ParsedFeed, ParseFeedError> {
    let parser = Builder::new()
        .id_generator(|_links, _title, _uri| String::new())
        .build();
    let feed = parser.parse(body)?;
    Ok(convert(feed))
}

fn convert(feed: model::Feed) -> ParsedFeed {
    let entries = feed.entries.into_iter().map(convert_entry).collect();
    ParsedFeed {
        title: feed.title.and_then(|t| non_empty(Some(t.content.as_str()))),
        entries,
    }
}

fn convert_entry(entry: model::Entry) -> Entry {
    // The "alternate" link is the article itself; otherwise take the first.
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or(entry.links.first())
        .and_then(|l| non_empty(Some(l.href.as_str())));

    let summary = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body));

    Entry {
        id: non_empty(Some(entry.id.as_str())),
        link,
        title: entry.title.and_then(|t| non_empty(Some(t.content.as_str()))),
        summary: non_empty(summary.as_deref()),
        published: entry.published,
        updated: entry.updated,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <id>urn:uuid:feed</id>
  <updated>2024-05-01T12:00:00Z</updated>
  <entry>
    <title>Atom Entry</title>
    <id>urn:uuid:entry-1</id>
    <link rel="alternate" href="https://example.com/atom/1"/>
    <updated>2024-05-01T12:00:00Z</updated>
    <published>2024-04-30T08:30:00Z</published>
    <summary>Short &lt;b&gt;summary&lt;/b&gt;</summary>
  </entry>
  <entry>
    <title>Updated Only</title>
    <id>urn:uuid:entry-2</id>
    <link href="https://example.com/atom/2"/>
    <updated>2024-05-02T09:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn parses_atom_entries() {
        let feed = parse_bytes(ATOM.as_bytes()).unwrap();

        assert_eq!(feed.title.as_deref(), Some("Example Atom"));
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.identifier(), "urn:uuid:entry-1");
        assert_eq!(first.display_title(), "Atom Entry");
        assert_eq!(first.link.as_deref(), Some("https://example.com/atom/1"));
        assert!(first.summary.as_deref().unwrap_or_default().contains("summary"));
        assert_eq!(
            first.timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 4, 30, 8, 30, 0).unwrap())
        );

        let second = &feed.entries[1];
        assert!(second.published.is_none());
        assert_eq!(
            second.timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn entry_without_id_is_identified_by_its_link() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>No Ids</title>
  <entry>
    <title>No id</title>
    <link href="https://example.com/post/1"/>
  </entry>
</feed>"#;
        let feed = parse_bytes(xml.as_bytes()).unwrap();
        let entry = &feed.entries[0];
        assert!(entry.id.is_none());
        assert_eq!(entry.identifier(), "https://example.com/post/1");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_bytes(b"definitely not a feed").is_err());
    }
}
