// src/exec/command.rs

//! Shell command execution for changed files.

use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::watch::{Callback, WatchedItem};

/// Environment variable carrying the changed file's absolute path.
pub const PATH_ENV_VAR: &str = "POLLWATCH_PATH";

/// Environment variable carrying the new fingerprint (seconds since the
/// epoch), or an empty string if the file vanished.
pub const FINGERPRINT_ENV_VAR: &str = "POLLWATCH_FINGERPRINT";

/// Build a shell command appropriate for the platform.
fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Run `cmd` for a changed `item` and wait for it to finish.
///
/// The command inherits stdout/stderr. `item`'s fingerprint is still the
/// previous one at this point; the current mtime is read fresh.
pub fn run_change_command(cmd: &str, item: &WatchedItem) -> Result<ExitStatus> {
    let path = item.path();
    let fingerprint = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(|modified| crate::watch::Fingerprint::new(modified).to_string())
        .unwrap_or_default();

    info!(?path, cmd = %cmd, "running change command");

    let status = shell_command(cmd)
        .env(PATH_ENV_VAR, path)
        .env(FINGERPRINT_ENV_VAR, fingerprint)
        .stdin(Stdio::null())
        .status()
        .with_context(|| format!("spawning change command '{cmd}' for {:?}", path))?;

    info!(
        ?path,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "change command exited"
    );
    Ok(status)
}

/// Callback running `cmd` through the shell for every changed file.
pub fn command_callback(cmd: impl Into<String>) -> Callback {
    let cmd = cmd.into();
    Callback::item(move |item| {
        if let Err(err) = run_change_command(&cmd, item) {
            error!(path = ?item.path(), error = %err, "change command failed");
        }
    })
}

/// Callback printing every changed path on stdout.
pub fn print_callback() -> Callback {
    Callback::item(|item| println!("{}", item.path().display()))
}
