use crate::types::{FetchConfig, Result, WatchError};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch the raw feed document. Transport errors, 429 and 5xx are retried
    /// with exponential backoff; other HTTP errors fail immediately.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let delay = Duration::from_millis(self.config.retry_delay_millis);
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: delay,
            initial_interval: delay,
            max_interval: delay * 16,
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.timeout_seconds.max(1) * 4)),
            ..Default::default()
        };

        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(content) => {
                    info!(
                        "Fetched feed: {} ({} bytes in {}ms)",
                        url,
                        content.len(),
                        start_time.elapsed().as_millis()
                    );
                    return Ok(content);
                }
                Err(e) if attempt < self.config.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    match backoff.next_backoff() {
                        Some(wait) => {
                            warn!(
                                "Attempt {} failed for {}, retrying in {:?}: {}",
                                attempt, url, wait, e
                            );
                            tokio::time::sleep(wait).await;
                        }
                        None => return Err(e),
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(WatchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let limit = self.config.max_feed_size_mb * 1024 * 1024;
        if let Some(content_length) = response.content_length() {
            if content_length as usize > limit {
                return Err(WatchError::FeedTooLarge {
                    size_mb: content_length as usize / (1024 * 1024),
                });
            }
        }

        let content = response.text().await?;
        if content.len() > limit {
            return Err(WatchError::FeedTooLarge {
                size_mb: content.len() / (1024 * 1024),
            });
        }
        Ok(content)
    }
}

fn is_retryable(error: &WatchError) -> bool {
    match error {
        WatchError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        WatchError::Status { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        _ => false,
    }
}
