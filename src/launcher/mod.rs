//! Agent launch
//!
//! Fire-and-forget spawn of the agent with a fixed command line, identical
//! on every invocation. The launcher does not wait for the agent to reach
//! a ready state; whether it actually came up is judged afterwards by the
//! health probe and the window surface classifier.

use anyhow::{Context, Result};
use std::process::Command;
use std::thread;
use tracing::{debug, warn};

/// Starts the supervised agent process.
pub trait AgentLauncher {
    /// Spawn the agent, returning its pid. Failure to start the executable
    /// at all is fatal for the calling cycle and is propagated, not retried.
    fn launch(&self) -> Result<u32>;
}

/// `AgentLauncher` that spawns a fixed external command.
pub struct CommandLauncher {
    command: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let command = command.into();
        // Preflight only warns: the command may appear on PATH between now
        // and the first launch, and a hard failure belongs to the cycle.
        if which::which(&command).is_err() {
            warn!("launch command '{command}' not found on PATH");
        }
        Self { command, args }
    }
}

impl AgentLauncher for CommandLauncher {
    fn launch(&self) -> Result<u32> {
        debug!("running command: {} {}", self.command, self.args.join(" "));

        let child = Command::new(&self.command)
            .args(&self.args)
            .spawn()
            .with_context(|| format!("failed to spawn '{}'", self.command))?;

        let pid = child.id();
        spawn_reaper_thread(child);
        Ok(pid)
    }
}

/// Spawn a background thread to reap the child when it exits.
///
/// Ensures `wait()` is eventually called so the launcher process never
/// leaves zombies behind. The thread lives until the child exits.
fn spawn_reaper_thread(mut child: std::process::Child) {
    thread::spawn(move || {
        let _ = child.wait();
    });
}
