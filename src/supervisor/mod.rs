//! The supervisory decision loop
//!
//! A single worker thread runs this loop for the life of the supervisor:
//! probe the agent, relaunch it when it is missing, diagnose a failed
//! relaunch from the window surface, and either keep polling or stop
//! supervising for good. Every fatal condition is carried as an explicit
//! outcome value back to `run()`, which makes the terminate decision
//! itself; nothing here unwinds through panics or fatal exceptions.
//!
//! There is deliberately no retry budget and no backoff. The loop either
//! sits in steady-state polling while the agent is healthy, or terminates
//! permanently on the first unresolved failure and leaves recovery to a
//! human starting a fresh supervisor.

mod status;

pub use status::{ChannelStatusSink, NullStatusSink, StatusSink};

use anyhow::{Context, Result};
use std::thread;
use thiserror::Error;
use tracing::{error, info};

use crate::classify::{ErrorClassification, ErrorClassifier};
use crate::config::SupervisorConfig;
use crate::health::{HealthChecker, HealthSignal};
use crate::housekeeping::{
    prune_oldest, session_stamp, take_screenshot, AutoLogonPolicy, SessionLog,
};
use crate::launcher::AgentLauncher;
use crate::process::ProcessTable;
use crate::reaper::Reaper;
use crate::windows::WindowSurface;

/// Lifecycle of a supervisor instance. One-directional: once terminated,
/// a supervisor never resumes; a fresh process must be started externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Why the supervisor stopped supervising.
#[derive(Debug, Error)]
pub enum TerminalReason {
    /// The agent exists but its handle count is off baseline: a known-bad
    /// resource state with no remediation. No launch or classification is
    /// attempted.
    #[error("agent handle count {observed} deviates from baseline {baseline}")]
    HandleAnomaly { observed: u64, baseline: u64 },

    /// A relaunch was attempted and the window surface shows why it did
    /// not come up. Recoverable only by a human.
    #[error("agent failed to start: {0}")]
    LaunchFailed(ErrorClassification),

    /// The launch command itself could not be spawned.
    #[error("failed to spawn agent: {0:#}")]
    Spawn(anyhow::Error),
}

/// Result of one supervision cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Agent healthy or recovered; sleep the poll interval and go again.
    Continue,
    /// Fatal: stop supervising permanently.
    Terminate(TerminalReason),
}

pub struct Supervisor<T, W, L>
where
    T: ProcessTable,
    W: WindowSurface,
    L: AgentLauncher,
{
    config: SupervisorConfig,
    table: T,
    surface: W,
    launcher: L,
    checker: HealthChecker,
    classifier: ErrorClassifier,
    reaper: Reaper,
    autologon: Box<dyn AutoLogonPolicy>,
    status: Box<dyn StatusSink>,
    session_log: SessionLog,
    state: LoopState,
    self_pid: u32,
}

impl<T, W, L> Supervisor<T, W, L>
where
    T: ProcessTable,
    W: WindowSurface,
    L: AgentLauncher,
{
    pub fn new(
        config: SupervisorConfig,
        table: T,
        surface: W,
        launcher: L,
        autologon: Box<dyn AutoLogonPolicy>,
        status: Box<dyn StatusSink>,
    ) -> Result<Self> {
        std::fs::create_dir_all(&config.logs_dir).with_context(|| {
            format!("failed to create logs directory {}", config.logs_dir.display())
        })?;

        let checker = HealthChecker::new(config.agent_process.as_str(), config.baseline_handles);
        let reaper = Reaper::new(
            config.agent_process.as_str(),
            config.supervisor_process.as_str(),
        );
        let session_log = SessionLog::new(&config.logs_dir, &session_stamp());

        Ok(Self {
            config,
            table,
            surface,
            launcher,
            checker,
            classifier: ErrorClassifier::new(),
            reaper,
            autologon,
            status,
            session_log,
            state: LoopState::Running,
            self_pid: std::process::id(),
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.session_log
    }

    /// One-time setup before the first cycle: clear out stale supervisor
    /// instances, start the session record, prune old session files, and
    /// capture the audit screenshot.
    fn startup(&mut self) {
        self.session_log.log("Starting new session");

        let killed = self
            .reaper
            .kill_duplicate_supervisors(&mut self.table, self.self_pid);
        if killed > 0 {
            self.session_log
                .log(&format!("Terminated {killed} stale supervisor instance(s)"));
        }

        match prune_oldest(&self.config.logs_dir, self.config.max_log_items) {
            Ok(deleted) if !deleted.is_empty() => {
                self.session_log
                    .log(&format!("Pruned {} old log file(s)", deleted.len()));
            }
            Ok(_) => {}
            Err(e) => self.session_log.log(&format!("Log pruning failed: {e:#}")),
        }

        let screenshot = self
            .config
            .logs_dir
            .join(format!("session_{}.png", session_stamp()));
        take_screenshot(&screenshot);
        self.session_log.log("Captured session screenshot");
    }

    /// Run the loop until it terminates. Never returns while the agent
    /// stays healthy; the only exits are the fatal paths.
    pub fn run(&mut self) -> TerminalReason {
        self.startup();

        loop {
            match self.run_cycle() {
                CycleOutcome::Continue => thread::sleep(self.config.poll_interval),
                CycleOutcome::Terminate(reason) => {
                    self.state = LoopState::Terminated;
                    error!("supervision terminated: {reason}");
                    self.session_log
                        .log(&format!("Terminating supervision: {reason}"));
                    self.status.update(&format!("Stopped: {reason}"));
                    return reason;
                }
            }
        }
    }

    /// One supervision cycle. Public so tests can drive the state machine
    /// without real sleeps; `run()` owns the poll-interval pacing.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        if let Err(e) = self.autologon.apply() {
            // Best-effort by contract: note it and carry on.
            self.session_log
                .log(&format!("Unable to apply auto-logon settings: {e}"));
        }

        self.status.update("Checking...");
        match self.checker.probe(&mut self.table) {
            HealthSignal::Healthy => CycleOutcome::Continue,
            HealthSignal::Anomalous { handle_count } => {
                self.session_log.log(&format!(
                    "Agent handle count {handle_count} deviates from baseline {}; giving up",
                    self.checker.baseline()
                ));
                CycleOutcome::Terminate(TerminalReason::HandleAnomaly {
                    observed: handle_count,
                    baseline: self.checker.baseline(),
                })
            }
            HealthSignal::Absent => self.launch_and_classify(),
        }
    }

    /// The agent is missing: relaunch it, give its dialogs time to appear,
    /// and read the verdict off the window surface.
    fn launch_and_classify(&mut self) -> CycleOutcome {
        self.session_log.log("Process not found, launching agent");
        self.status.update("Launching Jenkins slave agent...");

        if let Err(e) = self.launcher.launch() {
            self.session_log.log(&format!("Failed to launch agent: {e:#}"));
            return CycleOutcome::Terminate(TerminalReason::Spawn(e));
        }

        thread::sleep(self.config.settle_interval);

        match self.classifier.classify(&self.surface) {
            ErrorClassification::NoError => {
                info!("agent is back up");
                self.session_log.log("Agent is back up");
                self.status.update("Agent is back up");
                CycleOutcome::Continue
            }
            failure => {
                self.session_log
                    .log(&format!("{failure}: human intervention required"));
                // A misbehaving, partially-started agent gets cleaned up;
                // if no window ever appeared there is nothing to kill.
                if failure != ErrorClassification::SlaveAgentNotLaunched {
                    self.reaper.kill_agent(&mut self.table);
                }
                CycleOutcome::Terminate(TerminalReason::LaunchFailed(failure))
            }
        }
    }
}
