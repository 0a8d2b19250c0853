//! Auto-logon enforcement
//!
//! The workstation must log itself back in after a reboot or the agent can
//! never come up unattended. On Windows this means re-asserting three
//! Winlogon registry values at the top of every cycle; they have been seen
//! to revert after OS updates. Failures are reported to the session log by
//! the caller and never affect the supervision decision.

use std::process::Command;

/// Applied at the start of every supervision cycle, before the health
/// probe. Implementations must be best-effort and quick.
pub trait AutoLogonPolicy: Send {
    fn apply(&self) -> Result<(), String>;
}

/// No-op policy for platforms without an auto-logon concept (and tests).
pub struct NoAutoLogon;

impl AutoLogonPolicy for NoAutoLogon {
    fn apply(&self) -> Result<(), String> {
        Ok(())
    }
}

const WINLOGON_KEY: &str = r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion\Winlogon";

/// Writes the Winlogon auto-logon values via `reg add`.
pub struct WinlogonRegistry;

impl AutoLogonPolicy for WinlogonRegistry {
    fn apply(&self) -> Result<(), String> {
        if !cfg!(target_os = "windows") {
            return Ok(());
        }

        reg_add(WINLOGON_KEY, "AutoAdminLogon", "REG_DWORD", "1")?;
        reg_add(WINLOGON_KEY, "ForceAutoLogon", "REG_DWORD", "1")?;
        reg_add(&format!(r"{WINLOGON_KEY}\AutoLogonChecked"), "", "REG_SZ", "1")?;
        Ok(())
    }
}

fn reg_add(key: &str, value_name: &str, value_type: &str, data: &str) -> Result<(), String> {
    let mut command = Command::new("reg");
    command.arg("add").arg(key);
    if !value_name.is_empty() {
        command.arg("/v").arg(value_name);
    } else {
        command.arg("/ve");
    }
    command.arg("/t").arg(value_type).arg("/d").arg(data).arg("/f");

    command
        .output()
        .map_err(|e| format!("reg add failed to run: {e}"))
        .and_then(|output| {
            if output.status.success() {
                Ok(())
            } else {
                Err(format!("reg add {key} exited with {}", output.status))
            }
        })
}
