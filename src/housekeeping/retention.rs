//! Log directory retention
//!
//! The logs directory accumulates one text log and one screenshot per
//! session. Before a new session creates its files, the oldest entries
//! are pruned so the directory never grows past the retention cap.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;

/// Delete oldest files (by modification time) until the directory holds
/// fewer than `max_items` entries, leaving room for the new session's
/// files. Returns the deleted paths.
pub fn prune_oldest(logs_dir: &Path, max_items: usize) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<(SystemTime, PathBuf)> = fs::read_dir(logs_dir)
        .with_context(|| format!("failed to read logs dir {}", logs_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .collect();

    if entries.len() < max_items {
        return Ok(Vec::new());
    }

    entries.sort_by_key(|(modified, _)| *modified);

    // Prune down to max_items - 2 so the directory has headroom for the
    // log/screenshot pair this session is about to create.
    let excess = entries.len() + 2 - max_items;
    let mut deleted = Vec::with_capacity(excess);
    for (_, path) in entries.into_iter().take(excess) {
        info!("deleting old log file {}", path.display());
        fs::remove_file(&path)
            .with_context(|| format!("failed to delete {}", path.display()))?;
        deleted.push(path);
    }
    Ok(deleted)
}
