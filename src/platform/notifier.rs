//! Desktop notification backend.
//!
//! Shells out to the platform's notification tool instead of linking a
//! notification library: `notify-send` on Linux/BSD, `osascript` on macOS.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::core::system_monitor::Notifier;
use crate::error::{PcStatusError, Result};

pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new<S: Into<String>>(app_name: S) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn show(&self, title: &str, body: &str, icon: Option<&Path>) -> Result<()> {
        let program = which::which("notify-send")
            .map_err(|_| PcStatusError::notifier("notify-send not found in PATH"))?;

        let mut cmd = Command::new(program);
        cmd.arg(format!("--app-name={}", self.app_name));
        if let Some(icon) = icon {
            cmd.arg("-i").arg(icon);
        }
        cmd.arg(title).arg(body);

        run(cmd)
    }

    #[cfg(target_os = "macos")]
    fn show(&self, title: &str, body: &str, _icon: Option<&Path>) -> Result<()> {
        let script = format!(
            "display notification \"{}\" with title \"{}\" subtitle \"{}\"",
            escape_applescript(body),
            escape_applescript(title),
            escape_applescript(&self.app_name)
        );

        let mut cmd = Command::new("osascript");
        cmd.arg("-e").arg(script);
        run(cmd)
    }

    #[cfg(not(unix))]
    fn show(&self, _title: &str, _body: &str, _icon: Option<&Path>) -> Result<()> {
        Err(PcStatusError::notifier(format!(
            "{}: no notification backend available on this platform",
            self.app_name
        )))
    }

    /// Start playback in the background; the cycle never waits for it.
    fn play(&self, sound: &Path) -> Result<()> {
        let player = ["paplay", "aplay", "afplay"]
            .iter()
            .find_map(|p| which::which(p).ok())
            .ok_or_else(|| PcStatusError::notifier("no audio player found in PATH"))?;

        Command::new(player)
            .arg(sound)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PcStatusError::notifier(format!("failed to play sound: {}", e)))?;
        Ok(())
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("pc_status")
    }
}

impl Notifier for DesktopNotifier {
    fn send(&self, title: &str, body: &str, icon: Option<&Path>, sound: Option<&Path>) -> Result<()> {
        self.show(title, body, icon)?;
        if let Some(sound) = sound {
            self.play(sound)?;
        }
        Ok(())
    }
}

#[cfg_attr(not(unix), allow(dead_code))]
fn run(mut cmd: Command) -> Result<()> {
    let output = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| PcStatusError::notifier(format!("failed to launch notifier: {}", e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(PcStatusError::notifier(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
