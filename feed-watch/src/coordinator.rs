use crate::digest::render_digest;
use crate::normalize::normalize_all;
use crate::reconcile::{reconcile, Reconciliation};
use crate::state::{write_batch, StateFile};
use crate::traits::{FeedSource, Notifier};
use crate::types::{FeedConfig, NewEntryRecord, Result, WatchError};
use crate::watermark::{Watermark, WatermarkStore};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// First time the feed was seen; entries were absorbed, none delivered.
    Initialized { entries: usize, recorded: bool },
    Checked { new_entries: usize },
    Failed { error: String },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    NotRequested,
    NothingToSend,
    Sent,
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    /// Configuration order across feeds, newest-first within a feed.
    pub new_entries: Vec<NewEntryRecord>,
    pub outcomes: Vec<(String, FeedOutcome)>,
    pub notification: NotificationStatus,
}

impl RunReport {
    pub fn failed_feeds(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, FeedOutcome::Failed { .. }))
            .count()
    }
}

/// Drives one run: every feed in turn, strictly sequentially.
pub struct RunCoordinator<S> {
    source: S,
    fetch_timeout: Duration,
}

impl<S: FeedSource> RunCoordinator<S> {
    pub fn new(source: S, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
        }
    }

    /// Reconcile every enabled feed against `store`, updating it in place.
    /// A failing feed is logged and left untouched; the others still run.
    pub async fn check_feeds(
        &self,
        feeds: &[FeedConfig],
        store: &mut WatermarkStore,
    ) -> RunReport {
        let mut new_entries = Vec::new();
        let mut outcomes = Vec::with_capacity(feeds.len());

        for feed in feeds {
            let name = feed.display_name();
            if !feed.enabled {
                debug!("[skip] {}: disabled", name);
                outcomes.push((feed.url.clone(), FeedOutcome::Skipped));
                continue;
            }

            let outcome = match self.check_feed(feed, store).await {
                Ok(result) if result.is_first_run => {
                    let recorded = result.advanced.is_some();
                    if let Some(mark) = result.advanced {
                        store.record(&feed.url, mark);
                    }
                    info!("[init] {}: recorded state ({} items)", name, result.entries_found);
                    FeedOutcome::Initialized {
                        entries: result.entries_found,
                        recorded,
                    }
                }
                Ok(result) => {
                    if let Some(mark) = result.advanced {
                        store.record(&feed.url, mark);
                    }
                    let count = result.records.len();
                    info!("[check] {}: {} new items", name, count);
                    new_entries.extend(result.records);
                    FeedOutcome::Checked { new_entries: count }
                }
                Err(e) => {
                    error!("[error] {}: {}", name, e);
                    FeedOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push((feed.url.clone(), outcome));
        }

        RunReport {
            new_entries,
            outcomes,
            notification: NotificationStatus::NotRequested,
        }
    }

    async fn check_feed(&self, feed: &FeedConfig, store: &WatermarkStore) -> Result<FeedCheck> {
        let raws = tokio::time::timeout(self.fetch_timeout, self.source.fetch_entries(feed))
            .await
            .map_err(|_| WatchError::Timeout {
                elapsed: self.fetch_timeout,
            })??;

        let entries = normalize_all(raws);
        let Reconciliation {
            new_entries,
            advanced,
            is_first_run,
            examined,
        } = reconcile(&feed.url, &entries, &store.state_for(&feed.url));
        debug!("{}: examined {} of {} entries", feed.url, examined, entries.len());

        let name = feed.display_name();
        Ok(FeedCheck {
            records: new_entries.iter().map(|e| e.to_record(name)).collect(),
            advanced,
            is_first_run,
            entries_found: entries.len(),
        })
    }

    /// A full run: load state, check feeds, persist state and the batch
    /// artifact, then hand the new entries to the notifier if one is given.
    /// Persistence errors abort the run; notification errors do not.
    pub async fn execute(
        &self,
        feeds: &[FeedConfig],
        state_file: &StateFile,
        batch_path: &Path,
        notifier: Option<&dyn Notifier>,
    ) -> Result<RunReport> {
        let mut store = state_file.load();
        let mut report = self.check_feeds(feeds, &mut store).await;

        state_file.save(&store)?;
        write_batch(batch_path, &report.new_entries)?;
        info!(
            "[done] {} new items written to {}",
            report.new_entries.len(),
            batch_path.display()
        );

        report.notification = match notifier {
            None => NotificationStatus::NotRequested,
            Some(_) if report.new_entries.is_empty() => {
                info!("No new items, digest not sent");
                NotificationStatus::NothingToSend
            }
            Some(notifier) => {
                let digest = render_digest(&report.new_entries);
                match notifier.send(&digest).await {
                    Ok(()) => NotificationStatus::Sent,
                    Err(e) => {
                        error!("Digest delivery failed (state already saved): {}", e);
                        NotificationStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            }
        };

        Ok(report)
    }
}

struct FeedCheck {
    records: Vec<NewEntryRecord>,
    advanced: Option<Watermark>,
    is_first_run: bool,
    entries_found: usize,
}
