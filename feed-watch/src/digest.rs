use crate::parser::extract_text_from_html;
use crate::types::{DigestMessage, NewEntryRecord};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::debug;

const SUMMARY_LIMIT: usize = 280;

/// Render the run's new entries as a digest, grouped by feed in the order
/// feeds first appear in `records`.
pub fn render_digest(records: &[NewEntryRecord]) -> DigestMessage {
    let groups = group_by_feed(records);
    let subject = format!(
        "Feed digest: {} new item{}",
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    );

    let mut text = String::new();
    let mut html = String::from("<html><body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", encode_text(&subject)));

    for (feed_name, entries) in &groups {
        text.push_str(&format!("== {} ({}) ==\n\n", feed_name, entries.len()));
        html.push_str(&format!("<h2>{}</h2>\n<ul>\n", encode_text(feed_name)));

        for entry in entries {
            let summary = smart_truncate(&extract_text_from_html(&entry.summary), SUMMARY_LIMIT);

            text.push_str(&format!("* {}\n", entry.title));
            if !entry.link.is_empty() {
                text.push_str(&format!("  {}\n", entry.link));
            }
            if !entry.date.is_empty() {
                text.push_str(&format!("  {}\n", entry.date));
            }
            if !summary.is_empty() {
                text.push_str(&format!("  {}\n", summary));
            }
            text.push('\n');

            html.push_str("<li>");
            if entry.link.is_empty() {
                html.push_str(&format!("<strong>{}</strong>", encode_text(&entry.title)));
            } else {
                html.push_str(&format!(
                    "<a href=\"{}\"><strong>{}</strong></a>",
                    encode_double_quoted_attribute(&entry.link),
                    encode_text(&entry.title)
                ));
            }
            if !entry.date.is_empty() {
                html.push_str(&format!(" <small>{}</small>", encode_text(&entry.date)));
            }
            if !summary.is_empty() {
                html.push_str(&format!("<p>{}</p>", encode_text(&summary)));
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</body></html>\n");

    debug!("Rendered digest for {} feeds", groups.len());
    DigestMessage { subject, text, html }
}

fn group_by_feed(records: &[NewEntryRecord]) -> Vec<(&str, Vec<&NewEntryRecord>)> {
    let mut groups: Vec<(&str, Vec<&NewEntryRecord>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(name, _)| *name == record.feed_name) {
            Some((_, entries)) => entries.push(record),
            None => groups.push((record.feed_name.as_str(), vec![record])),
        }
    }
    groups
}

/// Truncate to at most `max_chars` characters. A sentence break is preferred
/// only in the back half of the window; otherwise cut at a word boundary.
pub fn smart_truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let truncated = &text[..cut];

    let late_sentence = truncated
        .rfind(". ")
        .filter(|&idx| truncated[..idx].chars().count() >= max_chars / 2);

    if let Some(last_sentence) = late_sentence {
        truncated[..last_sentence + 1].to_string()
    } else if let Some(last_space) = truncated.rfind(' ') {
        format!("{}...", &truncated[..last_space])
    } else {
        format!("{}...", truncated)
    }
}
