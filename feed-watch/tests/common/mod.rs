#![allow(dead_code)]

use async_trait::async_trait;
use feed_watch::{FeedConfig, FeedSource, RawEntry, Result, WatchError};
use std::collections::HashMap;
use std::sync::{Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn entry(title: &str, date: Option<&str>) -> RawEntry {
    RawEntry {
        title: Some(title.to_string()),
        link: Some(format!("https://example.com/{}", title)),
        date: date.map(str::to_string),
        snippet: Some(format!("About {}", title)),
        ..Default::default()
    }
}

pub enum Canned {
    Entries(Vec<RawEntry>),
    Fail(String),
    Hang,
}

/// Serves canned responses per feed URL and counts calls.
#[derive(Default)]
pub struct StubSource {
    responses: Mutex<HashMap<String, Canned>>,
    calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, url: &str, response: Canned) {
        self.responses.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StubSource {
    async fn fetch_entries(&self, feed: &FeedConfig) -> Result<Vec<RawEntry>> {
        self.calls.lock().unwrap().push(feed.url.clone());
        let response = match self.responses.lock().unwrap().get(&feed.url) {
            Some(Canned::Entries(entries)) => Some(Ok(entries.clone())),
            Some(Canned::Fail(msg)) => Some(Err(WatchError::Parse(msg.clone()))),
            Some(Canned::Hang) => None,
            None => Some(Ok(Vec::new())),
        };
        match response {
            Some(result) => result,
            None => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }
}
