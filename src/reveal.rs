//! Show a directory in the host's file browser.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// The platform's "open this folder" command.
fn opener() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Launch the file browser on `dir` without waiting for it.
///
/// Returns an error if `dir` does not exist or the opener could not be
/// spawned. Callers treat this as best-effort and only log failures.
pub fn reveal_in_file_browser(dir: &Path) -> io::Result<()> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        ));
    }

    let mut command = Command::new(opener());
    command.arg(dir);
    spawn_reaped(command).map(|_reaper| ())
}

/// Spawn `command` with null stdio and wait on it from a detached thread,
/// so the child never lingers as a zombie.
fn spawn_reaped(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(thread::spawn(move || child.wait()))
}
