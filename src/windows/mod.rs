//! Window surface queries
//!
//! Read-only view of the desktop's top-level window tree, used to spot the
//! dialogs a wedged agent throws up but cannot report programmatically.
//! The production probe shells out to `wmctrl` for the top-level list and
//! `xwininfo` for a window's descendants; warden never clicks or closes
//! anything, it only looks.

use std::process::Command;

use tracing::debug;

/// Opaque identifier for a window on the surface (an X11 window id on
/// Linux). Only ever fed back into the same probe that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowId(pub u64);

/// Read-only queries against the OS window tree.
pub trait WindowSurface {
    /// First top-level window whose title matches `title` exactly.
    fn find_toplevel(&self, title: &str) -> Option<WindowId>;

    /// First descendant of `parent` whose title matches `title` exactly.
    fn find_child(&self, parent: WindowId, title: &str) -> Option<WindowId>;
}

/// `WindowSurface` for an X11 desktop, via external tools.
///
/// Both queries degrade to "not found" when the tools are missing or the
/// display is unreachable; the classifier treats that the same as the
/// window genuinely not existing.
pub struct DesktopWindowSurface;

impl WindowSurface for DesktopWindowSurface {
    fn find_toplevel(&self, title: &str) -> Option<WindowId> {
        let output = Command::new("wmctrl").arg("-l").output().ok()?;
        if !output.status.success() {
            debug!("wmctrl -l exited with {}", output.status);
            return None;
        }
        let listing = String::from_utf8_lossy(&output.stdout);
        find_toplevel_in_listing(&listing, title)
    }

    fn find_child(&self, parent: WindowId, title: &str) -> Option<WindowId> {
        let output = Command::new("xwininfo")
            .arg("-id")
            .arg(format!("0x{:x}", parent.0))
            .arg("-tree")
            .output()
            .ok()?;
        if !output.status.success() {
            debug!("xwininfo exited with {}", output.status);
            return None;
        }
        let tree = String::from_utf8_lossy(&output.stdout);
        find_child_in_tree(&tree, title)
    }
}

/// Scan `wmctrl -l` output for a window titled exactly `title`.
///
/// Each line looks like:
/// `0x03a00007  0 hostname Jenkins slave agent`
/// (id, desktop number, client host, then the title with any spaces).
pub(crate) fn find_toplevel_in_listing(listing: &str, title: &str) -> Option<WindowId> {
    for line in listing.lines() {
        let mut cols = line.split_whitespace();
        let Some(id_field) = cols.next() else {
            continue;
        };
        // Skip the desktop and host columns; the remainder is the title.
        let window_title = cols.skip(2).collect::<Vec<_>>().join(" ");
        if window_title == title {
            if let Some(id) = parse_hex_window_id(id_field) {
                return Some(id);
            }
        }
    }
    None
}

/// Scan `xwininfo -tree` output for a descendant titled exactly `title`.
///
/// Child lines carry the title in double quotes:
/// `     0x3c00010 "Error": ("dialog" "Javaws")  300x120+10+10  +410+260`
/// Unnamed windows show `(has no name)` and never match.
pub(crate) fn find_child_in_tree(tree: &str, title: &str) -> Option<WindowId> {
    for line in tree.lines() {
        let trimmed = line.trim_start();
        if !trimmed.starts_with("0x") {
            continue;
        }
        let Some(id_end) = trimmed.find(char::is_whitespace) else {
            continue;
        };
        let id_field = &trimmed[..id_end];
        if let Some(window_title) = quoted_title(&trimmed[id_end..]) {
            if window_title == title {
                if let Some(id) = parse_hex_window_id(id_field) {
                    return Some(id);
                }
            }
        }
    }
    None
}

fn parse_hex_window_id(field: &str) -> Option<WindowId> {
    let hex = field.strip_prefix("0x")?;
    u64::from_str_radix(hex, 16).ok().map(WindowId)
}

fn quoted_title(rest: &str) -> Option<&str> {
    let start = rest.find('"')? + 1;
    let end = start + rest[start..].find('"')?;
    Some(&rest[start..end])
}
