//! Agent liveness probe
//!
//! Decides whether the supervised agent process is present and healthy.
//! "Healthy" is judged by the process's resource handle count sitting at a
//! known-good baseline; any other count means the agent is wedged in a
//! failure mode we have seen before and cannot recover from. The baseline
//! is a fixed configured constant, never recomputed at runtime.

use crate::process::ProcessTable;

/// Outcome of a single liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthSignal {
    /// No process with the agent's name exists.
    Absent,
    /// The agent is running with the expected handle count.
    Healthy,
    /// The agent exists but its handle count deviates from baseline.
    /// This is fatal: the process is alive but known to be wedged.
    Anomalous { handle_count: u64 },
}

pub struct HealthChecker {
    agent_name: String,
    baseline_handles: u64,
}

impl HealthChecker {
    pub fn new(agent_name: impl Into<String>, baseline_handles: u64) -> Self {
        Self {
            agent_name: agent_name.into(),
            baseline_handles,
        }
    }

    pub fn baseline(&self) -> u64 {
        self.baseline_handles
    }

    /// Probe the process table for the agent.
    ///
    /// Purely observational: no side effects on the table or the agent.
    pub fn probe(&self, table: &mut dyn ProcessTable) -> HealthSignal {
        let Some(process) = table.processes_named(&self.agent_name).into_iter().next() else {
            return HealthSignal::Absent;
        };

        if process.handle_count == self.baseline_handles {
            HealthSignal::Healthy
        } else {
            HealthSignal::Anomalous {
                handle_count: process.handle_count,
            }
        }
    }
}
