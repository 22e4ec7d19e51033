use crate::types::{FilterError, RawFeedItem, Result};
use chrono::Utc;
use feed_rs::parser;
use tracing::debug;

/// Turns RSS, Atom or JSON Feed documents into raw items.
///
/// Publish dates are parsed by feed-rs using the format the feed flavour
/// mandates (RFC 2822 for RSS, RFC 3339 for Atom). A date that does not match
/// comes back as `None` rather than failing the whole document.
#[derive(Debug, Default)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &str) -> Result<Vec<RawFeedItem>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| FilterError::Parse(format!("Failed to parse feed: {}", e)))?;

        let items: Vec<RawFeedItem> = feed.entries.into_iter().map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries", items.len());
        Ok(items)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> RawFeedItem {
        let title = entry.title.map(|t| t.content.trim().to_string());
        let link = entry.links.into_iter().next().map(|l| l.href);
        let published = entry.published.map(|dt| dt.with_timezone(&Utc));

        RawFeedItem {
            title,
            link,
            published,
        }
    }

    /// Cheap sniff for RSS/Atom markers before handing content to the parser.
    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel")
            || content_lower.trim_start().starts_with('{')
    }
}
