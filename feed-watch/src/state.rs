use crate::types::{NewEntryRecord, Result, WatchError};
use crate::watermark::{Watermark, WatermarkStore};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// JSON file holding `{feed url: watermark}` between runs.
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the store. A missing, unreadable or malformed file is an empty
    /// store; a single bad value only drops that feed's watermark.
    pub fn load(&self) -> WatermarkStore {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No state file at {}, starting fresh", self.path.display());
                return WatermarkStore::new();
            }
            Err(e) => {
                warn!("Could not read state file {}: {}", self.path.display(), e);
                return WatermarkStore::new();
            }
        };

        let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Ignoring malformed state file {}: {}", self.path.display(), e);
                return WatermarkStore::new();
            }
        };

        let store: WatermarkStore = raw
            .into_iter()
            .filter_map(|(feed, value)| {
                match value.as_str().and_then(Watermark::parse) {
                    Some(mark) => Some((feed, mark)),
                    None => {
                        warn!("Dropping unreadable watermark for {}: {}", feed, value);
                        None
                    }
                }
            })
            .collect();

        debug!("Loaded {} watermarks from {}", store.len(), self.path.display());
        store
    }

    pub fn save(&self, store: &WatermarkStore) -> Result<()> {
        write_json_atomic(&self.path, store)?;
        debug!("Saved {} watermarks to {}", store.len(), self.path.display());
        Ok(())
    }
}

/// Write the batch of new entries for downstream consumers.
pub fn write_batch(path: &Path, records: &[NewEntryRecord]) -> Result<()> {
    write_json_atomic(path, &records)
}

/// Serialize to a temp file next to `path`, sync it, then rename it over the
/// target so readers see either the old or the new contents.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let persist_err = |reason: String| WatchError::Persist {
        path: path.display().to_string(),
        reason,
    };

    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| persist_err(e.to_string()))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| persist_err(e.to_string()))?;
    let write = |tmp: &mut NamedTempFile| -> std::io::Result<()> {
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()
    };
    write(&mut tmp).map_err(|e| persist_err(e.to_string()))?;
    tmp.persist(path).map_err(|e| persist_err(e.error.to_string()))?;
    Ok(())
}
