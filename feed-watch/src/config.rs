use crate::notify::{EmailApiConfig, DEFAULT_EMAIL_API_URL};
use crate::types::{FeedConfig, Result, WatchError};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct FeedList {
    #[serde(default)]
    feeds: Vec<FeedConfig>,
}

/// Load the feed list and keep the enabled feeds, in file order. Any problem
/// with the file is a configuration error.
pub fn load_feeds(path: &Path) -> Result<Vec<FeedConfig>> {
    let content = fs::read_to_string(path).map_err(|e| {
        WatchError::Config(format!("reading feed list {}: {}", path.display(), e))
    })?;
    let feeds = parse_feeds(&content)?;
    info!("Loaded {} enabled feeds from {}", feeds.len(), path.display());
    Ok(feeds)
}

pub fn parse_feeds(content: &str) -> Result<Vec<FeedConfig>> {
    let list: FeedList = toml::from_str(content)?;
    let mut seen = HashSet::new();
    let mut feeds = Vec::with_capacity(list.feeds.len());

    for mut feed in list.feeds {
        feed.url = feed.url.trim().to_string();
        if !is_valid_feed_url(&feed.url) {
            return Err(WatchError::Config(format!("invalid feed URL: {:?}", feed.url)));
        }
        if !seen.insert(feed.url.clone()) {
            warn!("Feed {} is listed more than once; entries share one watermark", feed.url);
        }
        if feed.enabled {
            feeds.push(feed);
        }
    }

    Ok(feeds)
}

pub fn is_valid_feed_url(url_str: &str) -> bool {
    match Url::parse(url_str) {
        Ok(url) => url.scheme() == "http" || url.scheme() == "https",
        Err(_) => false,
    }
}

/// Email API settings from the environment. Only consulted when a digest
/// is requested; missing credentials are then a configuration error.
pub fn email_config_from_env() -> Result<EmailApiConfig> {
    fn required(name: &str) -> Result<String> {
        std::env::var(name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| WatchError::Config(format!("{} is not set", name)))
    }

    let to = required("DIGEST_TO")?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    if to.is_empty() {
        return Err(WatchError::Config("DIGEST_TO has no recipients".to_string()));
    }

    Ok(EmailApiConfig {
        api_url: std::env::var("DIGEST_API_URL")
            .unwrap_or_else(|_| DEFAULT_EMAIL_API_URL.to_string()),
        api_key: required("DIGEST_API_KEY")?,
        from: required("DIGEST_FROM")?,
        to,
    })
}
