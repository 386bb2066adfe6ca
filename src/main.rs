//! Terminal host and entry point.
//!
//! Wires the library together for an interactive terminal: configuration from
//! command-line flags, tracing to files, the TOML settings store, the
//! system clipboard and the real `dcli` runner. Frames are redrawn in full on
//! every change; input is one command per line.
//!
//! # Commands
//!
//! - `/term`: Search for `term` (`/` alone loads everything)
//! - `r`: Re-run the current search
//! - `s title|login|type`: Sort, toggling direction on repeat
//! - `v N`: Show details of row `N` (`v` alone closes them)
//! - `pw`: Show or hide the password in the details panel
//! - `c p|l|b [N]`: Copy password, login or both from row `N` or the open details
//! - `x`: Clear the clipboard now
//! - `delay N`: Clear the clipboard `N` seconds after a copy
//! - `n` / `p`: Next or previous page
//! - `h` / `hc`: Show recent searches / clear them
//! - `sync`: Log in with `dcli sync` in this terminal
//! - `check`: Probe `dcli` again
//! - `term`: Run `dcli accounts whoami` in a new terminal window
//! - `q`: Quit, clearing any copied secret
//!
//! # Input During Sync
//!
//! `dcli sync` inherits this terminal. The input thread pauses itself after
//! reading `sync` and waits until the runtime resumes it, so the two never
//! compete for standard input.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use dashview::app::{Column, Event};
use dashview::cli::Cli;
use dashview::clipboard::{CopyKind, SystemClipboard};
use dashview::process::{QueryEngine, StatusProbe, SyncCoordinator, SystemRunner};
use dashview::runtime::{Host, Runtime};
use dashview::storage::{Settings, SettingsStore, TomlSettingsStore};
use dashview::worker::CliWorker;
use dashview::{AppState, Config, Result, ViewerError};
use std::io::{BufRead, Write};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Condvar, Mutex};

/// Fallback size when the terminal cannot be queried.
const DEFAULT_ROWS: u16 = 24;
const DEFAULT_COLS: u16 = 80;

fn main() {
    let config = Cli::parse().into_config();

    dashview::observability::init_tracing(&config);

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "dashview exited with an error");
        eprintln!("dashview: {e}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let _span = tracing::info_span!("dashview", version = env!("CARGO_PKG_VERSION")).entered();

    let mut store = TomlSettingsStore::new(config.resolve_settings_path()?)?;
    let settings = store.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = %store.path().display(), "unreadable settings, using defaults");
        Settings::default()
    });

    let runner = Arc::new(SystemRunner::new());
    let probe = StatusProbe::new(runner.clone(), config.tool.clone());
    let sync = SyncCoordinator::new(runner.clone(), config.tool.clone(), probe.clone());
    let query = QueryEngine::new(runner, config.tool.clone());
    let worker = CliWorker::new(probe, sync, query);

    let state = dashview::initialize(config, settings, Box::new(SystemClipboard::new()));
    let gate = Arc::new(InputGate::default());
    let host = TerminalHost::new(Arc::clone(&gate));

    let mut runtime = Runtime::new(state, host, Box::new(store), worker);
    spawn_input_reader(runtime.sender(), gate)?;
    runtime.run()?;

    print!("\u{1b}[2J\u{1b}[H");
    std::io::stdout().flush()?;
    Ok(())
}

/// Pauses the input thread while a child process owns the terminal.
#[derive(Debug, Default)]
struct InputGate {
    suspended: Mutex<bool>,
    resumed: Condvar,
}

impl InputGate {
    fn set(&self, suspended: bool) {
        if let Ok(mut flag) = self.suspended.lock() {
            *flag = suspended;
        }
        self.resumed.notify_all();
    }

    fn wait_open(&self) {
        let Ok(mut flag) = self.suspended.lock() else {
            return;
        };
        while *flag {
            flag = match self.resumed.wait(flag) {
                Ok(flag) => flag,
                Err(_) => return,
            };
        }
    }
}

fn spawn_input_reader(sender: Sender<Event>, gate: Arc<InputGate>) -> Result<()> {
    std::thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                gate.wait_open();
                line.clear();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) | Err(_) => {
                        let _ = sender.send(Event::Quit);
                        return;
                    }
                    Ok(_) => {}
                }

                let event = match parse_command(&line) {
                    Ok(Some(event)) => event,
                    Ok(None) => continue,
                    Err(message) => Event::ActionFailed { message },
                };
                if event == Event::SyncRequested {
                    gate.set(true);
                }
                if sender.send(event).is_err() {
                    return;
                }
            }
        })
        .map(|_| ())
        .map_err(ViewerError::Io)
}

/// Translates one input line into an event. Blank lines yield `None`.
fn parse_command(line: &str) -> std::result::Result<Option<Event>, String> {
    let line = line.trim();
    if let Some(term) = line.strip_prefix('/') {
        let term = term.trim();
        return Ok(Some(if term.is_empty() {
            Event::ClearSearch
        } else {
            Event::Search(term.to_string())
        }));
    }

    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let row = |arg: Option<&str>| -> std::result::Result<Option<usize>, String> {
        arg.map(|n| match n.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(format!("'{n}' is not a row number.")),
        })
        .transpose()
    };

    let event = match command {
        "r" => Event::Refresh,
        "s" => {
            let column = arg.and_then(Column::parse).ok_or("Sort by title, login or type.")?;
            Event::SortBy(column)
        }
        "v" => match row(arg)? {
            Some(index) => Event::ShowDetails(index),
            None => Event::CloseDetails,
        },
        "pw" => Event::TogglePasswordVisibility,
        "c" => {
            let kind = match arg {
                Some("p") => CopyKind::Password,
                Some("l") => CopyKind::Login,
                Some("b") => CopyKind::LoginAndPassword,
                _ => return Err("Copy what? Use c p, c l or c b, optionally with a row number.".to_string()),
            };
            Event::Copy { index: row(words.next())?, kind }
        }
        "x" => Event::ClearClipboard,
        "delay" => {
            let seconds = arg
                .and_then(|n| n.parse::<u64>().ok())
                .ok_or("Usage: delay SECONDS")?;
            Event::SetClipboardDelay(seconds)
        }
        "n" => Event::ScrollPage { forward: true },
        "p" => Event::ScrollPage { forward: false },
        "h" => Event::ToggleHistory,
        "hc" => Event::ClearHistory,
        "sync" => Event::SyncRequested,
        "check" => Event::RecheckStatus,
        "term" => Event::OpenTerminalCheck,
        "q" | "quit" | "exit" => Event::Quit,
        other => return Err(format!("Unknown command '{other}'.")),
    };
    Ok(Some(event))
}

/// Draws frames on standard output.
struct TerminalHost {
    gate: Arc<InputGate>,
}

impl TerminalHost {
    const fn new(gate: Arc<InputGate>) -> Self {
        Self { gate }
    }
}

/// Current terminal size as `(rows, cols)`.
fn terminal_size() -> (u16, u16) {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => (rows, cols),
        Ok(_) => (DEFAULT_ROWS, DEFAULT_COLS),
        Err(e) => {
            tracing::debug!(error = %e, "terminal size unavailable, using 80x24");
            (DEFAULT_ROWS, DEFAULT_COLS)
        }
    }
}

impl Host for TerminalHost {
    fn render(&mut self, state: &AppState) -> Result<()> {
        let (rows, cols) = terminal_size();
        // The last row is the input line.
        let body_rows = usize::from(rows).saturating_sub(1);
        let frame = dashview::ui::render(state, body_rows, usize::from(cols));

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(frame.as_bytes())?;
        write!(stdout, "\u{1b}[{rows};1H\u{1b}[2K> ")?;
        stdout.flush()?;
        Ok(())
    }

    fn launch_terminal(&mut self, command: &[String]) -> Result<()> {
        dashview::infrastructure::terminal::launch(command)
    }

    fn suspend_input(&mut self) {
        // Leave the screen to the child process.
        print!("\u{1b}[2J\u{1b}[H");
        let _ = std::io::stdout().flush();
        self.gate.set(true);
    }

    fn resume_input(&mut self) {
        self.gate.set(false);
    }
}
