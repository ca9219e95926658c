//! Small helpers for launching external programs and formatting text.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

/// Longest title shown in the recent-items list before it is cut.
pub const MAX_TITLE_CHARS: usize = 64;

/// Cut `title` to [`MAX_TITLE_CHARS`] characters, ending in `...` when cut.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let head: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}

/// Open a URL with the platform opener, in the background.
pub fn open_url(url: &str) {
    spawn_detached(opener(), url);
}

/// Open the config file: in VS Code if `code` is on the PATH, otherwise with
/// the platform opener.
pub fn open_config(path: &Path) {
    let program = match which::which("code") {
        Ok(code) => code.into_os_string(),
        Err(_) => opener().into(),
    };
    spawn_detached(program, path);
}

#[cfg(target_os = "macos")]
fn opener() -> &'static str {
    "open"
}

#[cfg(not(target_os = "macos"))]
fn opener() -> &'static str {
    "xdg-open"
}

/// Run `program arg` on a background thread, discarding its output.
fn spawn_detached(program: impl AsRef<OsStr>, arg: impl AsRef<OsStr>) {
    let mut command = Command::new(program.as_ref());
    command
        .arg(arg.as_ref())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    let label = program.as_ref().to_string_lossy().into_owned();
    thread::spawn(move || match command.status() {
        Ok(status) => debug!(program = %label, ?status, "launched"),
        Err(e) => warn!(program = %label, error = %e, "could not launch"),
    });
}
