//! Decides which entries of a feed are new relative to its watermark.
//!
//! Entries must already be sorted newest-first (see
//! [`crate::normalize::sort_newest_first`]). The walk stops at the first
//! dated entry at or before the watermark: everything after it in sort order
//! is no newer. Undated entries cannot be placed relative to the watermark,
//! so once a feed has one they are dropped instead of being re-delivered on
//! every run; they carry no ordering information and do not stop the walk.
//!
//! A feed seen for the first time delivers nothing. Its newest entry's
//! timestamp becomes the watermark; if that entry is undated no watermark is
//! recorded and the next run is a first run again. Only the newest entry is
//! consulted, whatever undated entries surround it.

use crate::types::NormalizedEntry;
use crate::watermark::{Watermark, WatermarkState};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Newest first, in walk order.
    pub new_entries: Vec<NormalizedEntry>,
    /// Watermark to store after this run; `None` leaves the feed unchecked.
    pub advanced: Option<Watermark>,
    pub is_first_run: bool,
    /// Entries the walk looked at before finishing or short-circuiting.
    pub examined: usize,
}

pub fn reconcile(
    feed_id: &str,
    entries: &[NormalizedEntry],
    current: &WatermarkState,
) -> Reconciliation {
    let current_mark = current.watermark();

    if current_mark.is_none() && !entries.is_empty() {
        let advanced = entries[0].timestamp.map(Watermark::from_instant);
        debug!("{}: first run, {} entries absorbed", feed_id, entries.len());
        return Reconciliation {
            new_entries: Vec::new(),
            advanced,
            is_first_run: true,
            examined: 1,
        };
    }

    let mut new_entries = Vec::new();
    let mut newest_seen: Option<Watermark> = None;
    let mut examined = 0;

    for entry in entries {
        examined += 1;
        let entry_mark = entry.timestamp.map(Watermark::from_instant);

        match (&entry_mark, current_mark) {
            (Some(mark), Some(limit)) if mark <= limit => {
                debug!("{}: reached watermark {} at {}", feed_id, limit, mark);
                break;
            }
            (None, Some(_)) => {
                debug!("{}: dropping undated entry {:?}", feed_id, entry.title);
                continue;
            }
            _ => {}
        }

        if let Some(mark) = entry_mark {
            if newest_seen.as_ref().map_or(true, |seen| mark > *seen) {
                newest_seen = Some(mark);
            }
        }
        new_entries.push(entry.clone());
    }

    let advanced = match (current_mark, newest_seen) {
        (Some(limit), Some(seen)) => Some(std::cmp::max(limit.clone(), seen)),
        (Some(limit), None) => Some(limit.clone()),
        (None, seen) => seen,
    };

    Reconciliation {
        new_entries,
        advanced,
        is_first_run: false,
        examined,
    }
}
