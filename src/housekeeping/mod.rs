//! Housekeeping collaborators around the supervisor loop
//!
//! None of this participates in the supervision decision: the session log
//! and screenshot exist for the human who arrives after the supervisor has
//! given up, and the auto-logon write keeps the workstation able to come
//! back on its own after a reboot. Everything in here is best-effort;
//! failures are logged and swallowed, never surfaced into the loop.

mod autologon;
mod retention;
mod screenshot;
mod session_log;

pub use autologon::{AutoLogonPolicy, NoAutoLogon, WinlogonRegistry};
pub use retention::prune_oldest;
pub use screenshot::take_screenshot;
pub use session_log::{session_stamp, SessionLog};
