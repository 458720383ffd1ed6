use crate::traits::FeedSource;
use crate::types::{FeedConfig, FetchConfig, RawEntry, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;

/// Fetches feeds over HTTP and parses them with feed-rs.
pub struct HttpFeedSource {
    fetcher: Fetcher,
}

impl HttpFeedSource {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_entries(&self, feed: &FeedConfig) -> Result<Vec<RawEntry>> {
        let content = self.fetcher.fetch_feed(&feed.url).await?;
        let entries = FeedParser::parse_entries(&content)?;
        info!("Pulled {} entries from {}", entries.len(), feed.display_name());
        Ok(entries)
    }
}
