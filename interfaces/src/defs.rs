use serde::{Deserialize, Serialize};

/// One configured feed. The URL doubles as the key under which the feed's
/// watermark is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSpec {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl FeedSpec {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            enabled: true,
        }
    }

    /// Name used in logs and digests; the URL when no name was configured.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.url
        } else {
            &self.name
        }
    }
}

/// An entry as handed over by the fetch/parse side, before any
/// interpretation. `date` is expected to be ISO-8601 but is not trusted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    pub date: Option<String>,
    pub content: Option<String>,
    pub snippet: Option<String>,
}

/// The shape consumers of a run see: the batch artifact and the digest are
/// both built from a list of these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntryRecord {
    pub feed_name: String,
    pub title: String,
    pub link: String,
    /// Raw date string from the feed, empty when the entry had none.
    pub date: String,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

// Object style note:
// These are plain data. Anything that fetches, stores or sends lives in the
// implementation crate behind a trait, so a run can be assembled from real
// collaborators or from test doubles without touching these shapes.
