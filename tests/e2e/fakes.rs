//! Fake collaborators shared by the end-to-end scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use warden::launcher::AgentLauncher;
use warden::process::{ProcessInfo, ProcessTable};
use warden::windows::{WindowId, WindowSurface};

/// Process table state shared between the table fake and the launcher
/// fake, so a "launch" can make the agent process appear.
#[derive(Default)]
pub struct TableState {
    pub processes: Vec<ProcessInfo>,
    pub terminated: Vec<u32>,
}

#[derive(Clone)]
pub struct SharedTable(pub Arc<Mutex<TableState>>);

impl SharedTable {
    pub fn empty() -> Self {
        Self(Arc::new(Mutex::new(TableState::default())))
    }

    pub fn with_process(name: &str, pid: u32, handle_count: u64) -> Self {
        let table = Self::empty();
        table.0.lock().unwrap().processes.push(ProcessInfo {
            pid,
            name: name.to_string(),
            handle_count,
        });
        table
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.0.lock().unwrap().terminated.clone()
    }
}

impl ProcessTable for SharedTable {
    fn processes_named(&mut self, name: &str) -> Vec<ProcessInfo> {
        self.0
            .lock()
            .unwrap()
            .processes
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect()
    }

    fn terminate(&mut self, pid: u32) -> bool {
        let mut state = self.0.lock().unwrap();
        state.terminated.push(pid);
        state.processes.retain(|p| p.pid != pid);
        true
    }
}

/// Launcher that counts invocations and, optionally, plants an agent
/// process into the shared table as its "spawn".
pub struct ScriptedLauncher {
    table: SharedTable,
    spawns: Option<ProcessInfo>,
    fail_with: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedLauncher {
    pub fn inert(table: &SharedTable) -> Self {
        Self {
            table: table.clone(),
            spawns: None,
            fail_with: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn spawning(table: &SharedTable, name: &str, pid: u32, handle_count: u64) -> Self {
        Self {
            spawns: Some(ProcessInfo {
                pid,
                name: name.to_string(),
                handle_count,
            }),
            ..Self::inert(table)
        }
    }

    pub fn failing(table: &SharedTable, message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::inert(table)
        }
    }

}

impl AgentLauncher for ScriptedLauncher {
    fn launch(&self) -> Result<u32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }
        if let Some(process) = &self.spawns {
            self.table.0.lock().unwrap().processes.push(process.clone());
            return Ok(process.pid);
        }
        Ok(0)
    }
}

/// Static window surface described up front.
pub struct StaticSurface {
    toplevels: Vec<(String, u64)>,
    children: Vec<(u64, String, u64)>,
}

impl StaticSurface {
    pub fn empty() -> Self {
        Self {
            toplevels: vec![],
            children: vec![],
        }
    }

    pub fn with_toplevel(mut self, title: &str, id: u64) -> Self {
        self.toplevels.push((title.to_string(), id));
        self
    }

    pub fn with_child(mut self, parent: u64, title: &str, id: u64) -> Self {
        self.children.push((parent, title.to_string(), id));
        self
    }
}

impl WindowSurface for StaticSurface {
    fn find_toplevel(&self, title: &str) -> Option<WindowId> {
        self.toplevels
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, id)| WindowId(*id))
    }

    fn find_child(&self, parent: WindowId, title: &str) -> Option<WindowId> {
        self.children
            .iter()
            .find(|(p, t, _)| *p == parent.0 && t == title)
            .map(|(_, _, id)| WindowId(*id))
    }
}
