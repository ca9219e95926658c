//! Desktop notification delivery.
//!
//! The poll cycle produces [`NotificationRequest`]s; delivering them is the
//! job of a [`Notifier`].  [`DesktopNotifier`] shells out to the platform's
//! notification tool on a background thread and never reports failure back:
//! delivery is fire-and-forget.

use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

/// One notification to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub subtitle: String,
    pub body: String,
}

impl NotificationRequest {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            body: body.into(),
        }
    }
}

/// Something that can put a notification in front of the user.
pub trait Notifier: Send {
    fn notify(&self, request: &NotificationRequest);
}

/// Notifications through `osascript` on macOS and `notify-send` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, request: &NotificationRequest) {
        let mut command = platform_command(request);
        let title = request.title.clone();
        thread::spawn(move || {
            let status = command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            match status {
                Ok(s) if s.success() => debug!(%title, "notification delivered"),
                Ok(s) => warn!(%title, code = ?s.code(), "notification command failed"),
                Err(e) => warn!(%title, error = %e, "could not run notification command"),
            }
        });
    }
}

#[cfg(target_os = "macos")]
fn platform_command(request: &NotificationRequest) -> Command {
    let mut command = Command::new("osascript");
    command.arg("-e").arg(applescript(request));
    command
}

#[cfg(not(target_os = "macos"))]
fn platform_command(request: &NotificationRequest) -> Command {
    let mut command = Command::new("notify-send");
    command
        .arg("--app-name=Syndi")
        .arg(&request.title)
        .arg(format!("{}\n{}", request.subtitle, request.body));
    command
}

/// The `display notification` statement for `osascript -e`.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript(request: &NotificationRequest) -> String {
    format!(
        "display notification {} with title {} subtitle {}",
        quote(&request.body),
        quote(&request.title),
        quote(&request.subtitle)
    )
}

/// AppleScript string literal.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escapes_backslashes_and_quotes() {
        assert_eq!(quote(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn applescript_places_every_field() {
        let script = applescript(&NotificationRequest::new("Feed", "Entry", "Body"));
        assert_eq!(
            script,
            r#"display notification "Body" with title "Feed" subtitle "Entry""#
        );
    }
}
