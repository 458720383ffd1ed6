//! Per-feed watermarks and the in-memory store that holds them.
//!
//! Watermarks are compared as strings. That is only equivalent to comparing
//! instants when every value shares one fixed-width representation, so a
//! [`Watermark`] can only be built from an instant or by parsing and
//! re-formatting: always UTC, millisecond precision, `Z` suffix.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Watermark(String);

impl Watermark {
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Parse any RFC 3339 string and normalize it to the canonical form.
    pub fn parse(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value.trim())
            .ok()
            .map(|dt| Self::from_instant(dt.with_timezone(&Utc)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a feed has been seen before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkState {
    NeverChecked,
    CheckedAt(Watermark),
}

impl WatermarkState {
    pub fn watermark(&self) -> Option<&Watermark> {
        match self {
            WatermarkState::NeverChecked => None,
            WatermarkState::CheckedAt(mark) => Some(mark),
        }
    }
}

impl From<Option<Watermark>> for WatermarkState {
    fn from(value: Option<Watermark>) -> Self {
        match value {
            Some(mark) => WatermarkState::CheckedAt(mark),
            None => WatermarkState::NeverChecked,
        }
    }
}

/// Feed URL to last delivered timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WatermarkStore {
    marks: BTreeMap<String, Watermark>,
}

impl WatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_for(&self, feed_id: &str) -> WatermarkState {
        self.marks.get(feed_id).cloned().into()
    }

    /// Record a watermark for `feed_id`. An older value than the one already
    /// stored is ignored; returns whether the store changed.
    pub fn record(&mut self, feed_id: &str, mark: Watermark) -> bool {
        match self.marks.get(feed_id) {
            Some(existing) if *existing >= mark => false,
            _ => {
                self.marks.insert(feed_id.to_string(), mark);
                true
            }
        }
    }

    pub fn get(&self, feed_id: &str) -> Option<&Watermark> {
        self.marks.get(feed_id)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl FromIterator<(String, Watermark)> for WatermarkStore {
    fn from_iter<I: IntoIterator<Item = (String, Watermark)>>(iter: I) -> Self {
        Self {
            marks: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_normalizes_offsets_and_precision() {
        let a = Watermark::parse("2024-01-01T02:00:00+02:00").unwrap();
        let b = Watermark::parse("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Watermark::parse("yesterday").is_none());
        assert!(Watermark::parse("").is_none());
    }

    #[test]
    fn string_order_matches_time_order() {
        let earlier = Watermark::from_instant(Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap());
        let later = Watermark::parse("2024-01-02T00:30:00+01:00").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn record_never_moves_backwards() {
        let mut store = WatermarkStore::new();
        let newer = Watermark::parse("2024-03-01T00:00:00Z").unwrap();
        let older = Watermark::parse("2024-02-01T00:00:00Z").unwrap();

        assert!(store.record("feed", newer.clone()));
        assert!(!store.record("feed", older));
        assert_eq!(store.get("feed"), Some(&newer));
    }

    #[test]
    fn missing_key_is_never_checked() {
        let store = WatermarkStore::new();
        assert_eq!(store.state_for("https://example.com/rss"), WatermarkState::NeverChecked);
    }
}
