use crate::types::{DigestMessage, FeedConfig, RawEntry, Result};
use async_trait::async_trait;

/// Fetch/parse collaborator: turns a configured feed into its current
/// entries, in whatever order the document lists them.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self, feed: &FeedConfig) -> Result<Vec<RawEntry>>;
}

/// Delivers a rendered digest. Delivery is attempted once.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &DigestMessage) -> Result<()>;
}
