//! Full supervisor loop scenarios.

use std::time::Duration;

use warden::classify::ErrorClassification;
use warden::config::SupervisorConfig;
use warden::housekeeping::NoAutoLogon;
use warden::supervisor::{CycleOutcome, LoopState, NullStatusSink, Supervisor, TerminalReason};

use super::fakes::{ScriptedLauncher, SharedTable, StaticSurface};

const AGENT: &str = "jp2launcher";
const AGENT_WINDOW: &str = "Jenkins slave agent";

fn test_config(logs_dir: std::path::PathBuf) -> SupervisorConfig {
    SupervisorConfig {
        logs_dir,
        poll_interval: Duration::ZERO,
        settle_interval: Duration::ZERO,
        ..SupervisorConfig::default()
    }
}

fn build_supervisor(
    table: &SharedTable,
    surface: StaticSurface,
    launcher: ScriptedLauncher,
    logs_dir: &std::path::Path,
) -> Supervisor<SharedTable, StaticSurface, ScriptedLauncher> {
    Supervisor::new(
        test_config(logs_dir.to_path_buf()),
        table.clone(),
        surface,
        launcher,
        Box::new(NoAutoLogon),
        Box::new(NullStatusSink),
    )
    .expect("supervisor should construct")
}

/// Scenario A: agent missing, relaunch succeeds cleanly, loop goes back
/// to steady-state polling instead of terminating.
#[test]
fn missing_agent_is_relaunched_and_polling_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let table = SharedTable::empty();
    let launcher = ScriptedLauncher::spawning(&table, AGENT, 999, 22);
    let calls = launcher.calls.clone();
    let surface = StaticSurface::empty().with_toplevel(AGENT_WINDOW, 2);

    let mut supervisor = build_supervisor(&table, surface, launcher, dir.path());

    // First cycle: launch happens, classification is clean.
    assert!(matches!(supervisor.run_cycle(), CycleOutcome::Continue));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(supervisor.state(), LoopState::Running);

    // Next cycle finds the launched agent healthy; no second launch.
    assert!(matches!(supervisor.run_cycle(), CycleOutcome::Continue));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(table.terminated().is_empty());
}

/// Scenario B: a security dialog after relaunch is fatal, and the
/// half-started agent is killed before the supervisor gives up.
#[test]
fn security_dialog_kills_agent_and_terminates() {
    let dir = tempfile::tempdir().unwrap();
    let table = SharedTable::empty();
    let launcher = ScriptedLauncher::spawning(&table, AGENT, 999, 22);
    let surface = StaticSurface::empty()
        .with_toplevel("Security Warning", 1)
        .with_toplevel(AGENT_WINDOW, 2);

    let mut supervisor = build_supervisor(&table, surface, launcher, dir.path());
    let reason = supervisor.run();

    assert!(matches!(
        reason,
        TerminalReason::LaunchFailed(ErrorClassification::SecurityCheckError)
    ));
    assert_eq!(supervisor.state(), LoopState::Terminated);
    assert_eq!(table.terminated(), vec![999]);
}

/// Scenario C: no agent window ever appears; terminate without killing —
/// there is nothing running to kill.
#[test]
fn agent_never_appearing_terminates_without_kill() {
    let dir = tempfile::tempdir().unwrap();
    let table = SharedTable::empty();
    let launcher = ScriptedLauncher::inert(&table);
    let calls = launcher.calls.clone();

    let mut supervisor = build_supervisor(&table, StaticSurface::empty(), launcher, dir.path());
    let reason = supervisor.run();

    assert!(matches!(
        reason,
        TerminalReason::LaunchFailed(ErrorClassification::SlaveAgentNotLaunched)
    ));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(table.terminated().is_empty());
    assert_eq!(supervisor.state(), LoopState::Terminated);
}

/// Scenario D: an off-baseline handle count terminates immediately,
/// before any launch or classification is attempted.
#[test]
fn handle_anomaly_terminates_before_any_launch() {
    let dir = tempfile::tempdir().unwrap();
    let table = SharedTable::with_process(AGENT, 555, 20);
    let launcher = ScriptedLauncher::inert(&table);
    let calls = launcher.calls.clone();

    let mut supervisor = build_supervisor(&table, StaticSurface::empty(), launcher, dir.path());
    let reason = supervisor.run();

    match reason {
        TerminalReason::HandleAnomaly { observed, baseline } => {
            assert_eq!(observed, 20);
            assert_eq!(baseline, 22);
        }
        other => panic!("expected handle anomaly, got {other:?}"),
    }
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert!(table.terminated().is_empty());
}

/// A connection error dialog under the agent window is fatal and the
/// misbehaving agent is cleaned up.
#[test]
fn connection_error_kills_agent_and_terminates() {
    let dir = tempfile::tempdir().unwrap();
    let table = SharedTable::empty();
    let launcher = ScriptedLauncher::spawning(&table, AGENT, 777, 22);
    let surface = StaticSurface::empty()
        .with_toplevel(AGENT_WINDOW, 2)
        .with_child(2, "Error", 3);

    let mut supervisor = build_supervisor(&table, surface, launcher, dir.path());
    let reason = supervisor.run();

    assert!(matches!(
        reason,
        TerminalReason::LaunchFailed(ErrorClassification::ConnectionError)
    ));
    assert_eq!(table.terminated(), vec![777]);
}

/// Spawn failure is fatal for the session, not retried.
#[test]
fn spawn_failure_terminates_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let table = SharedTable::empty();
    let launcher = ScriptedLauncher::failing(&table, "javaws not installed");
    let calls = launcher.calls.clone();

    let mut supervisor = build_supervisor(&table, StaticSurface::empty(), launcher, dir.path());
    let reason = supervisor.run();

    assert!(matches!(reason, TerminalReason::Spawn(_)));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(supervisor.state(), LoopState::Terminated);
}

/// Startup clears out stale supervisor instances, but never the caller.
#[test]
fn startup_reaps_duplicate_supervisors() {
    let dir = tempfile::tempdir().unwrap();
    let table = SharedTable::empty();
    {
        let mut state = table.0.lock().unwrap();
        for pid in [4000, 4001] {
            state.processes.push(warden::process::ProcessInfo {
                pid,
                name: "warden".to_string(),
                handle_count: 10,
            });
        }
    }
    let launcher = ScriptedLauncher::inert(&table);

    let mut supervisor = build_supervisor(&table, StaticSurface::empty(), launcher, dir.path());
    // run() terminates via scenario C; what matters here is the startup
    // sweep of duplicate supervisors before the first cycle.
    let _ = supervisor.run();

    assert_eq!(table.terminated(), vec![4000, 4001]);
}

/// The session log records the terminal reason before the process exits.
#[test]
fn session_log_records_the_terminal_reason() {
    let dir = tempfile::tempdir().unwrap();
    let table = SharedTable::with_process(AGENT, 555, 31);
    let launcher = ScriptedLauncher::inert(&table);

    let mut supervisor = build_supervisor(&table, StaticSurface::empty(), launcher, dir.path());
    let _ = supervisor.run();

    let content = std::fs::read_to_string(supervisor.session_log().path()).unwrap();
    assert!(content.contains("Starting new session"));
    assert!(content.contains("Terminating supervision"));
    assert!(content.contains("31"));
}
