//! Launch failure classification
//!
//! After the agent has been launched and given time to settle, the window
//! surface is the only place its failure modes show up: Java Web Start
//! throws modal dialogs a headless supervisor cannot see through any API
//! on the agent itself. The classifier runs a fixed three-step probe over
//! the window tree and reports the first match. It never touches the
//! dialogs it finds; closing them is a human's job.

use std::fmt;

use crate::windows::WindowSurface;

/// Title of the Java Web Start certificate prompt.
const SECURITY_WARNING_TITLE: &str = "Security Warning";
/// Title of the agent's own top-level window once it is up.
const AGENT_WINDOW_TITLE: &str = "Jenkins slave agent";
/// Title of the connection failure dialog the agent window spawns.
const ERROR_DIALOG_TITLE: &str = "Error";

/// Terminal diagnosis of why the agent did not come up after a launch.
///
/// Only meaningful immediately after a launch attempt; while the agent is
/// healthy no classification is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    NoError,
    /// A "Security Warning" dialog is blocking startup (certificate or
    /// signature prompt).
    SecurityCheckError,
    /// The agent window exists but shows a connection error dialog.
    ConnectionError,
    /// No agent window appeared at all.
    SlaveAgentNotLaunched,
}

impl fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClassification::NoError => write!(f, "no error"),
            ErrorClassification::SecurityCheckError => write!(f, "security check dialog"),
            ErrorClassification::ConnectionError => write!(f, "connection error dialog"),
            ErrorClassification::SlaveAgentNotLaunched => write!(f, "agent window never appeared"),
        }
    }
}

#[derive(Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Probe the window surface, strictly in order, first match wins:
    ///
    /// 1. a top-level "Security Warning" window → `SecurityCheckError`
    /// 2. no top-level agent window → `SlaveAgentNotLaunched`
    /// 3. an "Error" dialog under the agent window → `ConnectionError`
    /// 4. otherwise → `NoError`
    ///
    /// The security dialog is checked before the agent window is even
    /// required to exist: a certificate prompt can block window creation
    /// entirely, and misreading that as "not launched" would hide the
    /// real cause.
    pub fn classify(&self, surface: &dyn WindowSurface) -> ErrorClassification {
        if surface.find_toplevel(SECURITY_WARNING_TITLE).is_some() {
            return ErrorClassification::SecurityCheckError;
        }

        let Some(agent_window) = surface.find_toplevel(AGENT_WINDOW_TITLE) else {
            return ErrorClassification::SlaveAgentNotLaunched;
        };

        if surface.find_child(agent_window, ERROR_DIALOG_TITLE).is_some() {
            return ErrorClassification::ConnectionError;
        }

        ErrorClassification::NoError
    }
}
