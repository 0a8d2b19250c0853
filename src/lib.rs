//! warden — keeps a Jenkins slave agent alive on a build workstation.
//!
//! The agent (a Java Web Start process) dies or wedges in ways it cannot
//! report itself: certificate prompts, connection error dialogs, silent
//! exits. warden polls the process table, relaunches the agent when it is
//! missing, reads failure dialogs off the desktop window tree, and stops
//! supervising, loudly, when a failure needs a human.

pub mod classify;
pub mod config;
pub mod health;
pub mod housekeeping;
pub mod launcher;
pub mod process;
pub mod reaper;
pub mod supervisor;
pub mod windows;

pub use classify::{ErrorClassification, ErrorClassifier};
pub use config::SupervisorConfig;
pub use health::{HealthChecker, HealthSignal};
pub use launcher::{AgentLauncher, CommandLauncher};
pub use process::{ProcessInfo, ProcessTable, SystemProcessTable};
pub use reaper::Reaper;
pub use supervisor::{CycleOutcome, LoopState, Supervisor, TerminalReason};
pub use windows::{DesktopWindowSurface, WindowId, WindowSurface};
