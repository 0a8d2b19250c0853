//! Per-session text log
//!
//! One line per event, `"<timestamp> - <message>"`, appended to a file
//! created at supervisor startup. This is the record a human reads after
//! the supervisor has terminated, so append failures must never take the
//! loop down with them.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Timestamp used in session file names, safe for filesystems.
pub fn session_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Log into `<logs_dir>/<stamp>_log.txt`.
    pub fn new(logs_dir: &Path, stamp: &str) -> Self {
        Self {
            path: logs_dir.join(format!("{stamp}_log.txt")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line. Best-effort: an unwritable log is
    /// reported through tracing and otherwise ignored.
    pub fn log(&self, message: &str) {
        let line = format!("{} - {message}\n", Local::now().format("%H:%M:%S"));
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = result {
            warn!("failed to append to session log {}: {e}", self.path.display());
        }
    }
}
