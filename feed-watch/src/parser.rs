use crate::types::{RawEntry, Result, WatchError};
use chrono::SecondsFormat;
use feed_rs::parser;
use tracing::debug;

pub struct FeedParser;

impl FeedParser {
    /// Parse an RSS/Atom document into raw entries, in document order.
    pub fn parse_entries(content: &str) -> Result<Vec<RawEntry>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| WatchError::Parse(format!("Failed to parse feed: {}", e)))?;

        let entries: Vec<RawEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();
        debug!("Parsed feed with {} entries", entries.len());
        Ok(entries)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> RawEntry {
        let title = entry.title.map(|t| t.content);
        let link = entry.links.first().map(|l| l.href.clone());

        // feed-rs synthesizes an id when the document has none
        let guid = if entry.id.is_empty() { None } else { Some(entry.id) };

        let date = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true));

        let content = entry.content.and_then(|c| c.body);
        let summary = entry.summary.map(|s| s.content);
        let snippet = summary
            .as_deref()
            .or(content.as_deref())
            .map(extract_text_from_html)
            .filter(|s| !s.is_empty());

        RawEntry {
            title,
            link,
            guid,
            date,
            content: content.or(summary),
            snippet,
        }
    }
}

/// Strip tags, decode entities and collapse whitespace.
pub fn extract_text_from_html(html: &str) -> String {
    let stripped = html
        .chars()
        .fold((String::new(), false), |(mut text, in_tag), c| match c {
            '<' => (text, true),
            '>' => {
                text.push(' ');
                (text, false)
            }
            _ if !in_tag => {
                text.push(c);
                (text, in_tag)
            }
            _ => (text, in_tag),
        })
        .0;

    html_escape::decode_html_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example</title>
    <link>https://example.com/</link>
    <description>Example feed</description>
    <item>
      <title>Second post</title>
      <link>https://example.com/2</link>
      <guid>https://example.com/2</guid>
      <pubDate>Wed, 03 Jan 2024 10:00:00 +0000</pubDate>
      <description>&lt;p&gt;Hello &lt;b&gt;world&lt;/b&gt;&lt;/p&gt;</description>
    </item>
    <item>
      <title>Undated post</title>
      <link>https://example.com/1</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_rss_items() {
        let entries = FeedParser::parse_entries(RSS).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.title.as_deref(), Some("Second post"));
        assert_eq!(first.link.as_deref(), Some("https://example.com/2"));
        assert_eq!(first.date.as_deref(), Some("2024-01-03T10:00:00.000Z"));
        assert_eq!(first.snippet.as_deref(), Some("Hello world"));

        assert!(entries[1].date.is_none());
    }

    #[test]
    fn rejects_non_feed_documents() {
        let err = FeedParser::parse_entries("<html><body>nope</body></html>").unwrap_err();
        assert!(matches!(err, WatchError::Parse(_)));
    }

    #[test]
    fn html_is_flattened() {
        assert_eq!(extract_text_from_html("<p>a</p><p>b  c</p>"), "a b c");
    }

    #[test]
    fn entities_in_descriptions_are_decoded() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Cartoons</title>
    <item>
      <title>Episode</title>
      <pubDate>Wed, 03 Jan 2024 10:00:00 +0000</pubDate>
      <description>&lt;p&gt;Tom &amp;amp; Jerry&amp;#8217;s &amp;nbsp;show&lt;/p&gt;</description>
    </item>
  </channel>
</rss>"#;

        let entries = FeedParser::parse_entries(rss).unwrap();

        assert_eq!(entries[0].snippet.as_deref(), Some("Tom & Jerry\u{2019}s show"));
    }
}
