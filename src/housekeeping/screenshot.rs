//! Startup audit screenshot
//!
//! One full-screen capture per session, written next to the session log.
//! It answers "what was actually on the screen" when someone investigates
//! a terminated session. Uses platform screenshot tools; best-effort.

use std::path::Path;
use std::process::Command;
use tracing::warn;

/// Capture the full screen to `target`. Failures are logged and
/// swallowed: a missing screenshot never blocks supervision.
pub fn take_screenshot(target: &Path) {
    let result = if cfg!(target_os = "macos") {
        capture_macos(target)
    } else {
        capture_linux(target)
    };

    if let Err(e) = result {
        warn!("screenshot capture failed: {e}");
    }
}

fn capture_linux(target: &Path) -> Result<(), String> {
    // ImageMagick first, gnome-screenshot as fallback.
    let attempts: [(&str, Vec<String>); 2] = [
        (
            "import",
            vec![
                "-window".to_string(),
                "root".to_string(),
                target.display().to_string(),
            ],
        ),
        (
            "gnome-screenshot",
            vec!["-f".to_string(), target.display().to_string()],
        ),
    ];

    let mut last_error = String::from("no screenshot tool available");
    for (tool, args) in attempts {
        if which::which(tool).is_err() {
            continue;
        }
        match Command::new(tool).args(&args).output() {
            Ok(output) if output.status.success() => return Ok(()),
            Ok(output) => last_error = format!("{tool} exited with {}", output.status),
            Err(e) => last_error = format!("{tool} failed: {e}"),
        }
    }
    Err(last_error)
}

fn capture_macos(target: &Path) -> Result<(), String> {
    Command::new("screencapture")
        .arg("-x")
        .arg(target)
        .output()
        .map_err(|e| format!("screencapture failed: {e}"))
        .and_then(|output| {
            if output.status.success() {
                Ok(())
            } else {
                Err(format!("screencapture exited with {}", output.status))
            }
        })
}
