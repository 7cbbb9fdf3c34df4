use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::OratioError;

use super::{HighlightRange, Rgb};

const FILE_VERSION: u32 = 1;

#[derive(Serialize)]
struct HighlightFileRef<'a> {
    version: u32,
    highlights: &'a BTreeMap<u32, Vec<HighlightRange>>,
}

#[derive(Deserialize)]
struct HighlightFile {
    version: u32,
    highlights: BTreeMap<u32, Vec<HighlightRange>>,
}

/// Psalm-number keyed highlight ranges, written through to a JSON snapshot on
/// every mutation.
///
/// Offsets are stored as given; the store never checks them against the
/// document text. Use [`HighlightStore::highlights_within`] when rendering
/// text that may have changed since the ranges were recorded.
pub struct HighlightStore {
    path: PathBuf,
    highlights: BTreeMap<u32, Vec<HighlightRange>>,
}

impl HighlightStore {
    /// Opens the store at `path`. A missing, unreadable or incompatible file
    /// yields an empty store; the condition is logged, never returned.
    pub fn open(path: PathBuf) -> Self {
        let highlights = if path.exists() {
            match load_snapshot(&path) {
                Ok(highlights) => {
                    info!(
                        "Highlights loaded from {}: {} psalms with highlights",
                        path.display(),
                        highlights.len()
                    );
                    highlights
                }
                Err(err) => {
                    warn!("Discarding unreadable highlight file {}: {err:#}", path.display());
                    BTreeMap::new()
                }
            }
        } else {
            info!("No saved highlights found at {}", path.display());
            BTreeMap::new()
        };

        Self { path, highlights }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_highlight(
        &mut self,
        key: u32,
        start: usize,
        end: usize,
        color: Rgb,
    ) -> Result<(), OratioError> {
        if start >= end {
            return Err(OratioError::InvalidRange { start, end });
        }

        self.highlights
            .entry(key)
            .or_default()
            .push(HighlightRange { start, end, color });
        self.save();
        Ok(())
    }

    /// Removes every range of `key` with exactly these bounds. Returns whether
    /// anything was removed.
    pub fn remove_highlight(&mut self, key: u32, start: usize, end: usize) -> bool {
        let Some(ranges) = self.highlights.get_mut(&key) else {
            return false;
        };

        let before = ranges.len();
        ranges.retain(|range| !(range.start == start && range.end == end));
        let removed = ranges.len() != before;

        if ranges.is_empty() {
            self.highlights.remove(&key);
        }

        self.save();
        removed
    }

    pub fn clear_highlights(&mut self, key: u32) {
        self.highlights.remove(&key);
        self.save();
    }

    pub fn highlights_for(&self, key: u32) -> &[HighlightRange] {
        self.highlights
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_highlights(&self, key: u32) -> bool {
        !self.highlights_for(key).is_empty()
    }

    /// Ranges of `key` that still fit inside a text of `text_len` characters,
    /// in insertion order.
    pub fn highlights_within(&self, key: u32, text_len: usize) -> Vec<HighlightRange> {
        self.highlights_for(key)
            .iter()
            .filter(|range| range.fits_within(text_len))
            .copied()
            .collect()
    }

    pub fn document_count(&self) -> usize {
        self.highlights.len()
    }

    /// Writes the whole map to disk.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create highlight directory {}", parent.display())
                })?;
            }
        }

        let snapshot = HighlightFileRef {
            version: FILE_VERSION,
            highlights: &self.highlights,
        };
        let serialized = serde_json::to_string_pretty(&snapshot)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }

    // In-memory state stays authoritative when the write fails.
    fn save(&self) {
        if let Err(err) = self.persist() {
            error!("Error saving highlights: {err:#}");
        }
    }
}

fn load_snapshot(path: &Path) -> Result<BTreeMap<u32, Vec<HighlightRange>>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: HighlightFile =
        serde_json::from_str(&contents).context("malformed highlight file")?;

    if file.version != FILE_VERSION {
        bail!(
            "highlight file version {} is not supported (expected {})",
            file.version,
            FILE_VERSION
        );
    }

    let mut highlights = file.highlights;
    highlights.retain(|_, ranges| {
        ranges.retain(|range| !range.is_empty());
        !ranges.is_empty()
    });
    Ok(highlights)
}
