use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
// Collaborator-facing shapes live in the interfaces crate
pub use interfaces::defs::{DigestMessage, NewEntryRecord, RawEntry};
pub use interfaces::defs::FeedSpec as FeedConfig;

/// Placeholder used when an entry has no usable title.
pub const UNTITLED: &str = "(no title)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    pub title: String,
    pub link: String,
    pub raw_date: Option<String>,
    /// Present iff `raw_date` was present and parseable.
    pub timestamp: Option<DateTime<Utc>>,
    pub summary: String,
}

impl NormalizedEntry {
    pub fn to_record(&self, feed_name: &str) -> NewEntryRecord {
        NewEntryRecord {
            feed_name: feed_name.to_string(),
            title: self.title.clone(),
            link: self.link.clone(),
            date: self.raw_date.clone().unwrap_or_default(),
            summary: self.summary.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_millis: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "feed-watch/0.1".to_string(),
            timeout_seconds: 15,
            max_retries: 2,
            retry_delay_millis: 500,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid feed list: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Timed out after {}ms", .elapsed.as_millis())]
    Timeout { elapsed: Duration },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Could not persist {path}: {reason}")]
    Persist { path: String, reason: String },

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;
