//! Process table access for warden
//!
//! Wraps OS process enumeration behind the `ProcessTable` trait so the
//! supervisor loop can be driven against a fake table in tests. The real
//! implementation sits on top of `sysinfo` and reads the per-process
//! handle count straight from the OS.

use std::path::Path;

use sysinfo::{ProcessesToUpdate, System};

/// A single entry from the process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    /// OS-reported resource handle count (open descriptors on Unix).
    /// Used as a coarse health proxy; 0 when the count cannot be read.
    pub handle_count: u64,
}

/// Read-mostly view of the host's running processes.
///
/// The only mutation this trait allows is `terminate`, which is
/// fire-and-forget: callers must not rely on the target shutting down
/// gracefully, or at all.
pub trait ProcessTable {
    /// All processes whose name matches `name` exactly.
    fn processes_named(&mut self, name: &str) -> Vec<ProcessInfo>;

    /// Issue a terminate for `pid`. Returns whether a terminate was sent;
    /// does not verify the process actually died.
    fn terminate(&mut self, pid: u32) -> bool;
}

/// `ProcessTable` backed by the live system via `sysinfo`.
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn refresh(&mut self) {
        self.system.refresh_processes(ProcessesToUpdate::All, true);
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcessTable {
    fn processes_named(&mut self, name: &str) -> Vec<ProcessInfo> {
        self.refresh();
        self.system
            .processes()
            .iter()
            .filter(|(_, process)| process.name().to_string_lossy() == name)
            .map(|(pid, process)| ProcessInfo {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                handle_count: handle_count(pid.as_u32()),
            })
            .collect()
    }

    fn terminate(&mut self, pid: u32) -> bool {
        self.refresh();
        match self.system.process(sysinfo::Pid::from_u32(pid)) {
            Some(process) => process.kill(),
            None => false,
        }
    }
}

/// Count of open resource handles for `pid`.
///
/// On Linux this is the number of entries under `/proc/<pid>/fd`. On other
/// platforms (or when the read fails, e.g. permissions) it is 0, which the
/// health check will flag as a deviation from baseline.
pub fn handle_count(pid: u32) -> u64 {
    count_fd_entries(Path::new(&format!("/proc/{pid}/fd"))).unwrap_or(0)
}

fn count_fd_entries(fd_dir: &Path) -> Option<u64> {
    let entries = std::fs::read_dir(fd_dir).ok()?;
    Some(entries.filter(|entry| entry.is_ok()).count() as u64)
}
