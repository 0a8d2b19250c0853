//! Supervisor configuration
//!
//! Everything is fixed at construction time: the agent and supervisor
//! process names, the launch command line, the two intervals, and the
//! handle-count baseline. Defaults match the CloudBees workstation setup
//! this tool was written for; an optional `warden.toml` next to the binary
//! can override individual fields. There are no command-line flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Process name the Java Web Start agent runs under.
pub const DEFAULT_AGENT_PROCESS: &str = "jp2launcher";
/// Process name of the supervisor itself, used for duplicate detection.
pub const DEFAULT_SUPERVISOR_PROCESS: &str = "warden";
/// Known-good handle count for a healthy agent. The observed failing
/// state sat at 20; anything off this value is treated as wedged.
pub const DEFAULT_BASELINE_HANDLES: u64 = 22;

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Expected process name of the supervised agent.
    pub agent_process: String,
    /// Process name supervisor instances run under.
    pub supervisor_process: String,
    /// Fixed launch command for the agent.
    pub launch_command: String,
    /// Fixed argument list, identical on every launch.
    pub launch_args: Vec<String>,
    /// Steady-state pause between health checks while the agent is up.
    pub poll_interval: Duration,
    /// Pause between launching the agent and probing for error dialogs,
    /// long enough for Java Web Start to throw its dialogs.
    pub settle_interval: Duration,
    /// Handle count a healthy agent is expected to hold.
    pub baseline_handles: u64,
    /// Directory for session logs and audit screenshots.
    pub logs_dir: PathBuf,
    /// Oldest log files are pruned once the directory reaches this count.
    pub max_log_items: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            agent_process: DEFAULT_AGENT_PROCESS.to_string(),
            supervisor_process: DEFAULT_SUPERVISOR_PROCESS.to_string(),
            launch_command: "javaws".to_string(),
            launch_args: vec!["-Xnosplash".to_string(), "./cloudbees-agent.jnlp".to_string()],
            poll_interval: Duration::from_secs(600),
            settle_interval: Duration::from_secs(5),
            baseline_handles: DEFAULT_BASELINE_HANDLES,
            logs_dir: PathBuf::from("warden-logs"),
            max_log_items: 20,
        }
    }
}

/// Raw `warden.toml` contents; every field optional, merged over defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    agent_process: Option<String>,
    supervisor_process: Option<String>,
    launch_command: Option<String>,
    launch_args: Option<Vec<String>>,
    poll_interval_secs: Option<u64>,
    settle_interval_secs: Option<u64>,
    baseline_handles: Option<u64>,
    logs_dir: Option<PathBuf>,
    max_log_items: Option<usize>,
}

impl SupervisorConfig {
    /// Load configuration, applying overrides from `path` if it exists.
    ///
    /// A missing file yields the defaults; a malformed file is an error
    /// (silently ignoring a typo'd config would defeat its purpose).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let mut config = Self::default();
        if let Some(v) = file.agent_process {
            config.agent_process = v;
        }
        if let Some(v) = file.supervisor_process {
            config.supervisor_process = v;
        }
        if let Some(v) = file.launch_command {
            config.launch_command = v;
        }
        if let Some(v) = file.launch_args {
            config.launch_args = v;
        }
        if let Some(v) = file.poll_interval_secs {
            config.poll_interval = Duration::from_secs(v);
        }
        if let Some(v) = file.settle_interval_secs {
            config.settle_interval = Duration::from_secs(v);
        }
        if let Some(v) = file.baseline_handles {
            config.baseline_handles = v;
        }
        if let Some(v) = file.logs_dir {
            config.logs_dir = v;
        }
        if let Some(v) = file.max_log_items {
            config.max_log_items = v;
        }
        Ok(config)
    }
}
