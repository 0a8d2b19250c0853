//! Process termination
//!
//! Two destructive operations, both fire-and-forget: clearing out stale
//! supervisor instances at startup (at most one warden may run per host),
//! and killing a partially-started agent before the supervisor gives up.
//! Neither verifies the target actually died, and neither grants the
//! target any graceful-shutdown courtesy.

use tracing::info;

use crate::process::ProcessTable;

pub struct Reaper {
    agent_name: String,
    supervisor_name: String,
}

impl Reaper {
    pub fn new(agent_name: impl Into<String>, supervisor_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            supervisor_name: supervisor_name.into(),
        }
    }

    /// Terminate every process carrying the supervisor's own name except
    /// `self_pid`. Best-effort: no verification, no retry. Returns how
    /// many terminations were issued.
    pub fn kill_duplicate_supervisors(
        &self,
        table: &mut dyn ProcessTable,
        self_pid: u32,
    ) -> usize {
        let duplicates: Vec<u32> = table
            .processes_named(&self.supervisor_name)
            .into_iter()
            .filter(|p| p.pid != self_pid)
            .map(|p| p.pid)
            .collect();

        let mut killed = 0;
        for pid in duplicates {
            info!("terminating duplicate supervisor instance (pid {pid})");
            if table.terminate(pid) {
                killed += 1;
            }
        }
        killed
    }

    /// Terminate the agent process if it is running. No-op when absent.
    pub fn kill_agent(&self, table: &mut dyn ProcessTable) -> bool {
        let Some(agent) = table.processes_named(&self.agent_name).into_iter().next() else {
            return false;
        };
        info!("terminating agent process (pid {})", agent.pid);
        table.terminate(agent.pid)
    }
}
