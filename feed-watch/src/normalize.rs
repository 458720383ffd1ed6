use crate::types::{NormalizedEntry, RawEntry, UNTITLED};
use chrono::{DateTime, Utc};

/// Parse an entry date. RFC 3339 is what the parser hands over; RFC 2822 is
/// accepted as well since that is what RSS `pubDate` carries verbatim.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn normalize(raw: RawEntry) -> NormalizedEntry {
    let timestamp = raw.date.as_deref().and_then(parse_timestamp);
    // Keep the raw string only alongside a parsed timestamp
    let raw_date = if timestamp.is_some() { raw.date } else { None };

    NormalizedEntry {
        title: non_empty(raw.title).unwrap_or_else(|| UNTITLED.to_string()),
        link: raw.link.unwrap_or_default(),
        raw_date,
        timestamp,
        summary: non_empty(raw.snippet)
            .or_else(|| non_empty(raw.content))
            .unwrap_or_default(),
    }
}

/// Newest first. Undated entries sort as the oldest; the sort is stable so
/// equal keys keep their source order.
pub fn sort_newest_first(entries: &mut [NormalizedEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

pub fn normalize_all(raws: Vec<RawEntry>) -> Vec<NormalizedEntry> {
    let mut entries: Vec<NormalizedEntry> = raws.into_iter().map(normalize).collect();
    sort_newest_first(&mut entries);
    entries
}
