//! The entry model shared by every feed format.
//!
//! Parsers convert their native items into [`Entry`] values whose fields are
//! all optional.  The fallback chains the rest of the application relies on
//! live here, in one place:
//!
//! * identifier: `id` → `link` → [`NO_LINK`]
//! * display title: `title` → [`NO_TITLE`]
//! * display link: `link` → [`NO_LINK`]
//! * timestamp: `published` → `updated` → caller's clock

use chrono::{DateTime, Utc};

/// Placeholder for entries without a link.  Also the identifier of entries
/// that carry neither an id nor a link.
pub const NO_LINK: &str = "No link available";

/// Placeholder for entries without a title.
pub const NO_TITLE: &str = "No title";

/// Placeholder for feeds without a channel title.
pub const NO_FEED_TITLE: &str = "No feed title";

/// A single feed entry, normalised from RSS or Atom.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Entry {
    /// `<guid>` for RSS, `<id>` for Atom.
    pub id: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    /// Summary or description, possibly containing HTML.
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl Entry {
    /// The key used for de-duplication.  Compared as an exact string.
    pub fn identifier(&self) -> &str {
        self.id
            .as_deref()
            .or(self.link.as_deref())
            .unwrap_or(NO_LINK)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_TITLE)
    }

    pub fn display_link(&self) -> &str {
        self.link.as_deref().unwrap_or(NO_LINK)
    }

    /// Publication time, falling back to the last-updated time.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published.or(self.updated)
    }
}

/// A parsed feed document.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<Entry>,
}

impl ParsedFeed {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_FEED_TITLE)
    }
}

/// Map empty or whitespace-only strings to `None`.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn identifier_prefers_id() {
        let entry = Entry {
            id: Some("guid-1".into()),
            link: Some("http://x/1".into()),
            ..Entry::default()
        };
        assert_eq!(entry.identifier(), "guid-1");
    }

    #[test]
    fn identifier_falls_back_to_link() {
        let entry = Entry {
            link: Some("http://x/1".into()),
            ..Entry::default()
        };
        assert_eq!(entry.identifier(), "http://x/1");
    }

    #[test]
    fn identifier_without_id_or_link_is_placeholder() {
        assert_eq!(Entry::default().identifier(), NO_LINK);
        assert_eq!(Entry::default().display_link(), NO_LINK);
        assert_eq!(Entry::default().display_title(), NO_TITLE);
    }

    #[test]
    fn timestamp_prefers_published_then_updated() {
        let published = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let both = Entry {
            published: Some(published),
            updated: Some(updated),
            ..Entry::default()
        };
        assert_eq!(both.timestamp(), Some(published));

        let only_updated = Entry {
            updated: Some(updated),
            ..Entry::default()
        };
        assert_eq!(only_updated.timestamp(), Some(updated));
        assert_eq!(Entry::default().timestamp(), None);
    }

    #[test]
    fn feed_title_placeholder() {
        assert_eq!(ParsedFeed::default().display_title(), NO_FEED_TITLE);
    }

    #[test]
    fn non_empty_drops_blank_values() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(" a ")), Some("a".to_string()));
    }
}
