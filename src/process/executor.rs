//! Running one external command to completion.
//!
//! [`CommandRunner`] is the seam between the orchestration logic and the OS.
//! [`SystemRunner`] spawns real processes; tests substitute scripted runners.
//!
//! A failed child process is an expected, structured result here. Non-zero
//! exit, timeout, missing executable and spawn failure are all reported as
//! fields of [`CommandOutcome`], never as errors.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const EXEC_BUSY_RETRY_ATTEMPTS: usize = 20;
const EXEC_BUSY_RETRY_DELAY: Duration = Duration::from_millis(10);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(25);
const DEFAULT_TEARDOWN_GRACE: Duration = Duration::from_secs(2);

/// How a command's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Streams are captured into memory and the run is bounded by `timeout`.
    /// Standard input is closed so the child can never wait on a prompt.
    Captured {
        /// Wall-clock budget before the child is killed.
        timeout: Duration,
    },
    /// Streams are inherited from the controlling terminal. No timeout; the
    /// operator may be answering prompts.
    Interactive,
}

/// One invocation to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub mode: ExecMode,
}

impl CommandSpec {
    /// Builds a captured invocation.
    pub fn captured<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            mode: ExecMode::Captured { timeout },
        }
    }

    /// Builds an interactive invocation.
    pub fn interactive<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            mode: ExecMode::Interactive,
        }
    }

    /// First argument, used as a short label in logs.
    #[must_use]
    pub fn subcommand(&self) -> &str {
        self.args.first().map_or("", String::as_str)
    }
}

/// Result of a single invocation. Produced once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code when the child exited normally.
    pub exit_code: Option<i32>,
    /// Captured standard output (empty in interactive mode).
    pub stdout: String,
    /// Captured standard error (empty in interactive mode).
    pub stderr: String,
    /// The child was killed after exceeding its timeout.
    pub timed_out: bool,
    /// The executable could not be located.
    pub not_found: bool,
    /// OS-level spawn or wait failure other than "not found".
    pub spawn_error: Option<String>,
}

impl CommandOutcome {
    /// Outcome for a missing executable.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            not_found: true,
            ..Self::default()
        }
    }

    /// Outcome for an OS-level failure to start or supervise the child.
    #[must_use]
    pub fn spawn_failed(message: impl Into<String>) -> Self {
        Self {
            spawn_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Outcome for a child that exited with `code`.
    #[must_use]
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    /// Outcome for a child killed on timeout with whatever it had printed.
    #[must_use]
    pub fn timed_out(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            timed_out: true,
            ..Self::default()
        }
    }

    /// Exit code zero, no timeout.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs commands to completion.
///
/// Implementations must be callable from any worker thread.
pub trait CommandRunner: Send + Sync {
    /// Runs `spec` and reports how it ended.
    fn run(&self, spec: &CommandSpec) -> CommandOutcome;
}

/// Runner backed by `std::process`.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    poll_interval: Duration,
    teardown_grace: Duration,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            teardown_grace: DEFAULT_TEARDOWN_GRACE,
        }
    }
}

impl SystemRunner {
    /// Creates a runner with the default 2 s teardown grace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides how long captured output is awaited after a timeout kill.
    #[must_use]
    pub const fn with_teardown_grace(mut self, grace: Duration) -> Self {
        self.teardown_grace = grace;
        self
    }

    fn run_captured(&self, spec: &CommandSpec, timeout: Duration) -> CommandOutcome {
        let spawned = retry_exec_busy(|| {
            Command::new(&spec.program)
                .args(&spec.args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
        });

        let mut child = match spawned {
            Ok(child) => child,
            Err(error) => return map_spawn_error(&spec.program, &error),
        };

        let (done_tx, done_rx) = mpsc::channel();
        let stdout_buf = Arc::new(Mutex::new(Vec::new()));
        let stderr_buf = Arc::new(Mutex::new(Vec::new()));
        let mut readers = 0;
        if let Some(pipe) = child.stdout.take() {
            spawn_reader(pipe, Arc::clone(&stdout_buf), done_tx.clone());
            readers += 1;
        }
        if let Some(pipe) = child.stderr.take() {
            spawn_reader(pipe, Arc::clone(&stderr_buf), done_tx.clone());
            readers += 1;
        }
        drop(done_tx);

        let deadline = Instant::now() + timeout;
        let status = match self.wait_until(&mut child, deadline) {
            Ok(status) => status,
            Err(error) => {
                terminate(&mut child);
                return CommandOutcome::spawn_failed(error.to_string());
            }
        };

        let grace_deadline = Instant::now() + self.teardown_grace;
        for _ in 0..readers {
            let remaining = grace_deadline.saturating_duration_since(Instant::now());
            if done_rx.recv_timeout(remaining).is_err() {
                tracing::warn!(program = %spec.program, "output readers did not finish within grace period");
                break;
            }
        }

        let stdout = drain(&stdout_buf);
        let stderr = drain(&stderr_buf);

        match status {
            Some(status) => CommandOutcome {
                exit_code: status.code(),
                stdout,
                stderr,
                ..CommandOutcome::default()
            },
            None => CommandOutcome::timed_out(stdout, stderr),
        }
    }

    /// Polls the child until it exits or `deadline` passes. Returns `None`
    /// after killing a child that overran.
    fn wait_until(&self, child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            let now = Instant::now();
            if now >= deadline {
                terminate(child);
                return Ok(None);
            }
            thread::sleep(self.poll_interval.min(deadline - now));
        }
    }

    fn run_interactive(spec: &CommandSpec) -> CommandOutcome {
        let status = retry_exec_busy(|| {
            Command::new(&spec.program)
                .args(&spec.args)
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
        });

        match status {
            Ok(status) => CommandOutcome {
                exit_code: status.code(),
                ..CommandOutcome::default()
            },
            Err(error) => map_spawn_error(&spec.program, &error),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> CommandOutcome {
        let span = tracing::debug_span!(
            "run_command",
            program = %spec.program,
            subcommand = %spec.subcommand(),
            mode = ?spec.mode
        );
        let _guard = span.entered();

        let started = Instant::now();
        let outcome = match spec.mode {
            ExecMode::Captured { timeout } => self.run_captured(spec, timeout),
            ExecMode::Interactive => Self::run_interactive(spec),
        };

        tracing::debug!(
            exit_code = ?outcome.exit_code,
            timed_out = outcome.timed_out,
            not_found = outcome.not_found,
            stdout_len = outcome.stdout.len(),
            stderr_len = outcome.stderr.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "command finished"
        );

        outcome
    }
}

fn spawn_reader<R>(mut pipe: R, sink: Arc<Mutex<Vec<u8>>>, done: mpsc::Sender<()>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut chunk = [0_u8; 4096];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if let Ok(mut buf) = sink.lock() {
                        buf.extend_from_slice(&chunk[..n]);
                    }
                }
            }
        }
        let _ = done.send(());
    });
}

fn drain(buf: &Arc<Mutex<Vec<u8>>>) -> String {
    buf.lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn terminate(child: &mut Child) {
    if let Err(error) = child.kill() {
        tracing::debug!(error = %error, "kill after timeout failed");
    }
    let _ = child.wait();
}

fn map_spawn_error(program: &str, error: &io::Error) -> CommandOutcome {
    if error.kind() == io::ErrorKind::NotFound {
        tracing::debug!(program = %program, "executable not found");
        return CommandOutcome::not_found();
    }
    tracing::warn!(program = %program, error = %error, "failed to start command");
    CommandOutcome::spawn_failed(error.to_string())
}

fn retry_exec_busy<T, F>(mut operation: F) -> io::Result<T>
where
    F: FnMut() -> io::Result<T>,
{
    let mut last_error = None;
    for attempt in 0..EXEC_BUSY_RETRY_ATTEMPTS {
        match operation() {
            Ok(value) => return Ok(value),
            Err(error) if is_exec_busy_error(&error) && attempt + 1 < EXEC_BUSY_RETRY_ATTEMPTS => {
                last_error = Some(error);
                thread::sleep(EXEC_BUSY_RETRY_DELAY);
            }
            Err(error) => return Err(error),
        }
    }

    Err(last_error.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "command execution failed")))
}

fn is_exec_busy_error(error: &io::Error) -> bool {
    cfg!(unix) && error.raw_os_error() == Some(26)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_reported_as_not_found() {
        let runner = SystemRunner::new();
        let spec = CommandSpec::captured(
            "dashview-definitely-missing-binary",
            ["--version"],
            Duration::from_secs(1),
        );
        let outcome = runner.run(&spec);
        assert!(outcome.not_found);
        assert!(!outcome.timed_out);
        assert_eq!(outcome.exit_code, None);
    }

    #[cfg(unix)]
    #[test]
    fn captures_both_streams_and_exit_code() {
        let runner = SystemRunner::new();
        let spec = CommandSpec::captured(
            "sh",
            ["-c", "printf out; printf err >&2; exit 3"],
            Duration::from_secs(5),
        );
        let outcome = runner.run(&spec);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stdout, "out");
        assert_eq!(outcome.stderr, "err");
        assert!(!outcome.succeeded());
    }

    #[cfg(unix)]
    #[test]
    fn overrunning_child_is_killed_with_partial_output() {
        let runner = SystemRunner::new().with_teardown_grace(Duration::from_millis(500));
        let spec = CommandSpec::captured(
            "sh",
            ["-c", "printf partial; exec sleep 30"],
            Duration::from_millis(300),
        );
        let started = Instant::now();
        let outcome = runner.run(&spec);
        assert!(outcome.timed_out);
        assert_eq!(outcome.exit_code, None);
        assert_eq!(outcome.stdout, "partial");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn captured_stdin_is_closed() {
        let runner = SystemRunner::new();
        let spec = CommandSpec::captured("sh", ["-c", "cat; echo done"], Duration::from_secs(5));
        let outcome = runner.run(&spec);
        assert!(outcome.succeeded());
        assert_eq!(outcome.stdout.trim(), "done");
    }

    #[test]
    fn exec_busy_is_retried_then_surfaced() {
        let mut calls = 0;
        let result: io::Result<()> = retry_exec_busy(|| {
            calls += 1;
            Err(io::Error::from_raw_os_error(26))
        });
        assert!(result.is_err());
        if cfg!(unix) {
            assert_eq!(calls, EXEC_BUSY_RETRY_ATTEMPTS);
        }
    }
}
