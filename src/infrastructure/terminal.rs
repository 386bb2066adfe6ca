//! Opening a command in a new terminal window.
//!
//! Used to let the operator answer `dcli` prompts (master password, 2FA) in a
//! real terminal while this one keeps running. Candidates are tried in order;
//! a candidate whose program is missing falls through to the next one.
//! The launcher process is waited on from a background thread so it never
//! lingers as a zombie.

use crate::domain::error::{Result, ViewerError};
use std::io::ErrorKind;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

/// Terminal command lines that run `command` on `os` (as in
/// [`std::env::consts::OS`]), in preference order.
#[must_use]
pub fn candidates(os: &str, command: &[String]) -> Vec<Vec<String>> {
    let with_prefix = |prefix: &[&str]| -> Vec<String> {
        prefix
            .iter()
            .map(ToString::to_string)
            .chain(command.iter().cloned())
            .collect()
    };

    match os {
        "windows" => vec![with_prefix(&["cmd", "/c", "start", "cmd", "/k"])],
        "macos" => vec![with_prefix(&["open", "-a", "Terminal", "--args"])],
        _ => vec![
            with_prefix(&["gnome-terminal", "--"]),
            with_prefix(&["xterm", "-e"]),
        ],
    }
}

/// Starts `command` in a new terminal window without waiting for it.
///
/// # Errors
///
/// Returns [`ViewerError::Terminal`] when no candidate could be started.
pub fn launch(command: &[String]) -> Result<()> {
    launch_with(&candidates(std::env::consts::OS, command), |argv| {
        let child = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Err(e) = reap_in_background(child) {
            tracing::warn!(terminal = %argv[0], error = %e, "could not start reaper thread");
        }
        Ok(())
    })
}

fn reap_in_background(mut child: Child) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    let pid = child.id();
    std::thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => {
                tracing::debug!(pid, %status, "terminal launcher exited");
                Some(status)
            }
            Err(e) => {
                tracing::warn!(pid, error = %e, "could not wait for terminal launcher");
                None
            }
        })
}

fn launch_with<F>(candidates: &[Vec<String>], mut spawn: F) -> Result<()>
where
    F: FnMut(&[String]) -> std::io::Result<()>,
{
    let mut tried = Vec::new();
    for argv in candidates.iter().filter(|argv| !argv.is_empty()) {
        match spawn(argv) {
            Ok(()) => {
                tracing::info!(terminal = %argv[0], "opened terminal window");
                return Ok(());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(terminal = %argv[0], "terminal emulator not installed");
                tried.push(argv[0].clone());
            }
            Err(e) => {
                return Err(ViewerError::Terminal(format!("could not start {}: {e}", argv[0])));
            }
        }
    }
    Err(ViewerError::Terminal(format!(
        "no terminal emulator found (tried {})",
        tried.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whoami() -> Vec<String> {
        vec!["dcli".to_string(), "accounts".to_string(), "whoami".to_string()]
    }

    #[test]
    fn linux_prefers_gnome_terminal_then_xterm() {
        let lists = candidates("linux", &whoami());
        assert_eq!(lists[0], ["gnome-terminal", "--", "dcli", "accounts", "whoami"]);
        assert_eq!(lists[1], ["xterm", "-e", "dcli", "accounts", "whoami"]);
    }

    #[test]
    fn macos_and_windows_have_one_candidate() {
        assert_eq!(
            candidates("macos", &whoami()),
            [["open", "-a", "Terminal", "--args", "dcli", "accounts", "whoami"]]
        );
        assert_eq!(candidates("windows", &whoami())[0][..5], ["cmd", "/c", "start", "cmd", "/k"]);
    }

    #[test]
    fn missing_emulator_falls_through() {
        let mut seen = Vec::new();
        let result = launch_with(&candidates("linux", &whoami()), |argv| {
            seen.push(argv[0].clone());
            if argv[0] == "gnome-terminal" {
                Err(std::io::Error::from(ErrorKind::NotFound))
            } else {
                Ok(())
            }
        });
        assert!(result.is_ok());
        assert_eq!(seen, ["gnome-terminal", "xterm"]);
    }

    #[test]
    fn no_emulator_is_an_error() {
        let result = launch_with(&candidates("linux", &whoami()), |_| {
            Err(std::io::Error::from(ErrorKind::NotFound))
        });
        assert!(matches!(result, Err(ViewerError::Terminal(m)) if m.contains("xterm")));
    }

    #[cfg(unix)]
    #[test]
    fn launched_process_is_waited_on() {
        let child = Command::new("sh").args(["-c", "exit 3"]).spawn().unwrap();
        let status = reap_in_background(child).unwrap().join().unwrap();
        assert_eq!(status.and_then(|s| s.code()), Some(3));
    }
}
