// gx-core/src/infrastructure/browser.rs

use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::GxError;
use crate::ports::browser::Browser;

/// Opens pages with `$BROWSER` when set, otherwise with the platform opener.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        if let Some(cmd) = browser_from_env(url) {
            return cmd;
        }
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

// $BROWSER is a ':'-separated list; the first entry wins, `%s` marks the url
fn browser_from_env(url: &str) -> Option<Command> {
    parse_browser(&std::env::var("BROWSER").ok()?, url)
}

fn parse_browser(value: &str, url: &str) -> Option<Command> {
    let first = value.split(':').map(str::trim).find(|s| !s.is_empty())?;
    let mut parts = first.split_whitespace();
    let mut cmd = Command::new(parts.next()?);
    let mut placed = false;
    for part in parts {
        if part.contains("%s") {
            cmd.arg(part.replace("%s", url));
            placed = true;
        } else {
            cmd.arg(part);
        }
    }
    if !placed {
        cmd.arg(url);
    }
    Some(cmd)
}

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), GxError> {
        let mut cmd = Self::command(url);
        debug!(?cmd, "Opening browser");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}
