//! Event handling and session transitions.
//!
//! [`handle_event`] is the only place session state changes. It runs on the
//! foreground thread, never blocks, and returns the side effects the runtime
//! should perform as [`Action`]s.
//!
//! # Event Types
//!
//! - **Session**: `Start`, `RecheckStatus`, `SyncRequested`, `OpenTerminalCheck`
//! - **Browsing**: `Search`, `Refresh`, `ClearSearch`, `SortBy`, `ScrollPage`
//! - **Details**: `ShowDetails`, `CloseDetails`, `TogglePasswordVisibility`
//! - **Clipboard**: `Copy`, `ClipboardTick`, `ClearClipboard`, `SetClipboardDelay`
//! - **History**: `ToggleHistory`, `ClearHistory`
//! - **Runtime**: `WorkerResponse`, `ActionFailed`, `Quit`
//!
//! # Example
//!
//! ```
//! use dashview::app::{handle_event, Action, AppState, Event};
//! use dashview::clipboard::SystemClipboard;
//! use dashview::process::ToolConfig;
//! use dashview::storage::Settings;
//! use dashview::ui::Theme;
//!
//! let mut state = AppState::new(
//!     Theme::default(),
//!     ToolConfig::default(),
//!     Settings::default(),
//!     Box::new(SystemClipboard::new()),
//! );
//! let (_render, actions) = handle_event(&mut state, &Event::Start)?;
//! assert!(matches!(actions[0], Action::PostToWorker(_)));
//! # Ok::<(), dashview::ViewerError>(())
//! ```

use super::modes::SessionPhase;
use super::sort::Column;
use super::state::{AppState, DetailsView, Status};
use crate::app::Action;
use crate::clipboard::{CopyKind, TickOutcome};
use crate::domain::error::Result;
use crate::domain::{missing_password_message, CliError, Record};
use crate::process::{Acceptance, AuthState, QueryTicket, SyncResult, INSTALL_URL};
use crate::worker::{WorkerMessage, WorkerResponse};
use secrecy::SecretString;
use std::time::{Duration, Instant};

/// Retry interval after the clipboard refused to clear.
const CLEAR_RETRY: Duration = Duration::from_secs(1);

/// Everything that can happen to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The application started.
    Start,
    /// Probe installation and authentication again.
    RecheckStatus,
    /// Run `dcli sync` interactively.
    SyncRequested,
    /// Launch `dcli accounts whoami` in a new terminal window.
    OpenTerminalCheck,

    /// Query for a term. A blank term loads everything.
    Search(String),
    /// Re-run the current search.
    Refresh,
    /// Empty the search term and load everything.
    ClearSearch,
    SortBy(Column),
    ScrollPage { forward: bool },

    /// Open the details of the row at this 0-based index.
    ShowDetails(usize),
    CloseDetails,
    TogglePasswordVisibility,

    /// Copy from the row at `index`, or from the open details when `None`.
    Copy { index: Option<usize>, kind: CopyKind },
    /// Scheduled countdown tick for one clipboard exposure.
    ClipboardTick { generation: u64 },
    ClearClipboard,
    SetClipboardDelay(u64),

    ToggleHistory,
    ClearHistory,

    WorkerResponse(WorkerResponse),
    /// The runtime could not carry out an action.
    ActionFailed { message: String },
    Quit,
}

impl From<WorkerResponse> for Event {
    fn from(response: WorkerResponse) -> Self {
        Self::WorkerResponse(response)
    }
}

/// Processes an event against the current time.
///
/// # Errors
///
/// See [`handle_event_at`].
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    handle_event_at(state, event, Instant::now())
}

/// Processes an event, mutates session state, and returns whether to re-render
/// along with the actions to execute in order.
///
/// # Errors
///
/// Currently never returns `Err`. Failures are reported on the status line.
#[allow(clippy::too_many_lines)]
pub fn handle_event_at(
    state: &mut AppState,
    event: &Event,
    now: Instant,
) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event), phase = state.phase.name()).entered();

    match event {
        Event::Start => {
            if state.phase != SessionPhase::Init {
                return Ok((false, vec![]));
            }
            Ok((true, begin_probe(state)))
        }
        Event::RecheckStatus => {
            if !state.phase.can_recheck() {
                state.status = Status::warn("Cannot re-check while dcli is busy.");
                return Ok((true, vec![]));
            }
            Ok((true, begin_probe(state)))
        }
        Event::SyncRequested => match state.phase {
            SessionPhase::LoginPrompt { .. } => {
                tracing::info!("starting interactive sync");
                state.phase = SessionPhase::Syncing;
                state.status = Status::info(format!("Running {} sync in this terminal...", state.tool.binary));
                Ok((
                    true,
                    vec![Action::SuspendInput, Action::PostToWorker(WorkerMessage::sync_account())],
                ))
            }
            SessionPhase::Syncing => {
                state.status = Status::warn("A sync is already running.");
                Ok((true, vec![]))
            }
            _ => {
                // The host pauses input when it sends a sync request.
                state.status = Status::warn("Sync is only needed when dcli is not authenticated.");
                Ok((true, vec![Action::ResumeInput]))
            }
        },
        Event::OpenTerminalCheck => {
            if state.phase == SessionPhase::ToolMissingPrompt {
                state.status = Status::warn(format!("Install dcli from {INSTALL_URL} first."));
                return Ok((true, vec![]));
            }
            state.status = Status::info("Please check your dcli authentication in the terminal. Ready.");
            Ok((
                true,
                vec![Action::LaunchTerminal {
                    command: state.tool.whoami_argv(),
                }],
            ))
        }

        Event::Search(term) => {
            let term = term.trim().to_string();
            state.search_term.clone_from(&term);
            Ok((true, begin_query(state, &term)))
        }
        Event::Refresh => {
            let term = state.search_term.clone();
            Ok((true, begin_query(state, &term)))
        }
        Event::ClearSearch => {
            state.search_term.clear();
            let actions = begin_query(state, "");
            if state.phase.can_query() {
                state.status = Status::info("Search field cleared. Loading all accessible items...");
            }
            Ok((true, actions))
        }
        Event::SortBy(column) => {
            if !state.phase.can_query() {
                return Ok((false, vec![]));
            }
            state.sort_by(*column);
            Ok((true, vec![]))
        }
        Event::ScrollPage { forward } => {
            state.scroll_page(*forward);
            Ok((true, vec![]))
        }

        Event::ShowDetails(index) => {
            let Some(record) = state.records.get(*index).cloned() else {
                state.status = Status::warn(format!("No item at row {}.", index + 1));
                return Ok((true, vec![]));
            };
            state.details = Some(DetailsView {
                index: *index,
                record: record.clone(),
                revealed: false,
            });
            if record.password().is_none() {
                state.status = Status::warn(missing_password_message(&record));
                return Ok((true, vec![]));
            }
            Ok((true, copy_from(state, &record, CopyKind::Password, now)))
        }
        Event::CloseDetails => {
            let was_open = state.details.take().is_some();
            Ok((was_open, vec![]))
        }
        Event::TogglePasswordVisibility => {
            let Some(view) = state.details.as_mut() else {
                return Ok((false, vec![]));
            };
            view.revealed = !view.revealed;
            Ok((true, vec![]))
        }

        Event::Copy { index, kind } => {
            let record = match index {
                Some(i) => state.records.get(*i).cloned(),
                None => state.details.as_ref().map(|d| d.record.clone()),
            };
            let Some(record) = record else {
                state.status = Status::warn("No item selected.");
                return Ok((true, vec![]));
            };
            Ok((true, copy_from(state, &record, *kind, now)))
        }
        Event::ClipboardTick { generation } => Ok(clipboard_tick(state, *generation, now)),
        Event::ClearClipboard => {
            match state.clipboard.clear_now() {
                Ok(()) => {
                    state.clipboard_countdown = None;
                    state.status = Status::info("Clipboard cleared. Ready.");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "manual clipboard clear failed");
                    state.status = Status::error(format!("Could not clear clipboard: {e}"));
                }
            }
            Ok((true, vec![]))
        }
        Event::SetClipboardDelay(seconds) => {
            let mut actions = vec![];
            if let Some(generation) = state.clipboard.set_delay(Duration::from_secs(*seconds), now) {
                actions.push(Action::ScheduleTick {
                    generation,
                    after: Duration::ZERO,
                });
            }
            actions.push(Action::PersistSettings(state.sync_settings()));
            let applied = state.clipboard.delay().as_secs();
            if applied == *seconds {
                state.status = Status::info(format!("Clipboard clear delay set to {applied} seconds."));
            } else {
                state.status = Status::warn(format!("Clipboard clear delay limited to {applied} seconds."));
            }
            Ok((true, actions))
        }

        Event::ToggleHistory => {
            state.show_history = !state.show_history;
            Ok((true, vec![]))
        }
        Event::ClearHistory => {
            state.history.clear();
            state.status = Status::info("Search history cleared!");
            Ok((true, vec![Action::PersistSettings(state.sync_settings())]))
        }

        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
        Event::ActionFailed { message } => {
            state.status = Status::error(message.clone());
            Ok((true, recover_from_failed_action(state, message)))
        }
        Event::Quit => {
            if let Err(e) = state.clipboard.cancel() {
                tracing::error!(error = %e, "could not clear clipboard on exit");
            }
            state.clipboard_countdown = None;
            Ok((false, vec![Action::Quit]))
        }
    }
}

/// Event name for spans. Payloads are left out since search terms and worker
/// results can be sensitive.
const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Start => "start",
        Event::RecheckStatus => "recheck_status",
        Event::SyncRequested => "sync_requested",
        Event::OpenTerminalCheck => "open_terminal_check",
        Event::Search(_) => "search",
        Event::Refresh => "refresh",
        Event::ClearSearch => "clear_search",
        Event::SortBy(_) => "sort_by",
        Event::ScrollPage { .. } => "scroll_page",
        Event::ShowDetails(_) => "show_details",
        Event::CloseDetails => "close_details",
        Event::TogglePasswordVisibility => "toggle_password_visibility",
        Event::Copy { .. } => "copy",
        Event::ClipboardTick { .. } => "clipboard_tick",
        Event::ClearClipboard => "clear_clipboard",
        Event::SetClipboardDelay(_) => "set_clipboard_delay",
        Event::ToggleHistory => "toggle_history",
        Event::ClearHistory => "clear_history",
        Event::WorkerResponse(_) => "worker_response",
        Event::ActionFailed { .. } => "action_failed",
        Event::Quit => "quit",
    }
}

/// Leaves phases that wait on a worker response, since a failed action means
/// that response will never arrive.
fn recover_from_failed_action(state: &mut AppState, message: &str) -> Vec<Action> {
    match state.phase {
        SessionPhase::ProbingStatus => {
            state.phase = SessionPhase::LoginPrompt {
                failure: Some(message.to_string()),
                offer_terminal_check: false,
            };
            vec![]
        }
        SessionPhase::Syncing => {
            state.phase = SessionPhase::LoginPrompt {
                failure: Some(message.to_string()),
                offer_terminal_check: false,
            };
            vec![Action::ResumeInput]
        }
        SessionPhase::Querying => {
            state.queries.reset();
            state.phase = SessionPhase::Browsing;
            vec![]
        }
        _ => vec![],
    }
}

fn begin_probe(state: &mut AppState) -> Vec<Action> {
    state.phase = SessionPhase::ProbingStatus;
    state.queries.reset();
    state.status = Status::info("Checking Dashlane CLI status...");
    vec![Action::PostToWorker(WorkerMessage::probe_status())]
}

fn begin_query(state: &mut AppState, term: &str) -> Vec<Action> {
    if !state.phase.can_query() {
        state.status = Status::warn("Not connected to Dashlane CLI.");
        return vec![];
    }

    state.phase = SessionPhase::Querying;
    state.status = if term.is_empty() {
        Status::info("Loading all accessible items from Dashlane CLI...")
    } else {
        Status::info(format!("Searching Dashlane CLI for '{term}'..."))
    };

    state
        .queries
        .request(term)
        .map(dispatch)
        .into_iter()
        .collect()
}

fn dispatch(ticket: QueryTicket) -> Action {
    Action::PostToWorker(WorkerMessage::fetch_items(ticket.seq, ticket.term))
}

/// Moves to browsing and immediately starts the initial full load.
fn enter_browsing(state: &mut AppState, identity: String) -> Vec<Action> {
    tracing::info!("dcli session confirmed, loading items");
    state.identity = Some(identity);
    state.phase = SessionPhase::Browsing;
    state.search_term.clear();
    begin_query(state, "")
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::StatusChecked { state: auth } => {
            if state.phase != SessionPhase::ProbingStatus {
                tracing::debug!("ignoring status result outside of probing");
                return (false, vec![]);
            }
            apply_auth_state(state, auth)
        }
        WorkerResponse::SyncFinished { result } => {
            let mut actions = vec![Action::ResumeInput];
            if state.phase != SessionPhase::Syncing {
                return (true, actions);
            }
            match result {
                SyncResult::Success { identity } => {
                    actions.extend(enter_browsing(state, identity.clone()));
                }
                SyncResult::Failure { message } => {
                    tracing::info!("sync did not authenticate");
                    state.phase = SessionPhase::LoginPrompt {
                        failure: Some(message.clone()),
                        offer_terminal_check: false,
                    };
                    state.status = Status::error(format!("Sync failed: {message}"));
                }
            }
            (true, actions)
        }
        WorkerResponse::SyncRejected { reason } => {
            state.status = Status::warn(reason.clone());
            (true, vec![])
        }
        WorkerResponse::ItemsFetched { seq, result } => match state.queries.accept(*seq) {
            Acceptance::Stale => (false, vec![]),
            Acceptance::Superseded { follow_up } => {
                tracing::debug!(seq, next = follow_up.seq, "result superseded by newer search");
                let term = follow_up.term.clone();
                state.status = if term.is_empty() {
                    Status::info("Loading all accessible items from Dashlane CLI...")
                } else {
                    Status::info(format!("Searching Dashlane CLI for '{term}'..."))
                };
                (true, vec![dispatch(follow_up)])
            }
            Acceptance::Current { term } => apply_query_result(state, &term, result),
        },
    }
}

fn apply_auth_state(state: &mut AppState, auth: &AuthState) -> (bool, Vec<Action>) {
    match auth {
        AuthState::ToolMissing => {
            state.phase = SessionPhase::ToolMissingPrompt;
            state.identity = None;
            state.status = Status::error(format!(
                "dcli not found. Install the Dashlane CLI from {INSTALL_URL}"
            ));
            (true, vec![])
        }
        AuthState::NotAuthenticated { diagnostic } => {
            state.phase = SessionPhase::LoginPrompt {
                failure: diagnostic.clone(),
                offer_terminal_check: false,
            };
            state.identity = None;
            state.status = Status::warn("dcli is not authenticated. Type `sync` to log in.");
            (true, vec![])
        }
        AuthState::Unknown { last_error } => {
            state.phase = SessionPhase::LoginPrompt {
                failure: Some(last_error.clone()),
                offer_terminal_check: false,
            };
            state.identity = None;
            state.status = Status::error(format!("Could not run dcli: {last_error}"));
            (true, vec![])
        }
        AuthState::Authenticated { identity } => (true, enter_browsing(state, identity.clone())),
    }
}

fn apply_query_result(
    state: &mut AppState,
    term: &str,
    result: &std::result::Result<Vec<Record>, CliError>,
) -> (bool, Vec<Action>) {
    match result {
        Ok(records) => {
            state.phase = SessionPhase::Browsing;
            state.details = None;
            state.set_records(records.clone());
            state.status = Status::info(format!("Loaded {} items. Ready.", records.len()));

            if state.history.record(term) {
                return (true, vec![Action::PersistSettings(state.sync_settings())]);
            }
            (true, vec![])
        }
        Err(error) if error.is_auth_related() => {
            tracing::info!(error = %error.title(), "query needs authentication");
            state.phase = SessionPhase::LoginPrompt {
                failure: Some(error.user_message()),
                offer_terminal_check: true,
            };
            state.identity = None;
            state.details = None;
            state.records.clear();
            state.status = Status::error(error.title().to_string());
            (true, vec![])
        }
        Err(CliError::ToolNotFound) => {
            state.phase = SessionPhase::ToolMissingPrompt;
            state.identity = None;
            state.details = None;
            state.records.clear();
            state.status = Status::error(CliError::ToolNotFound.user_message());
            (true, vec![])
        }
        Err(error) => {
            state.phase = SessionPhase::Browsing;
            state.details = None;
            state.records.clear();
            state.status = Status::error(format!("{}: {}", error.title(), error.user_message()));
            (true, vec![])
        }
    }
}

/// Puts the requested part of `record` on the clipboard under a countdown.
fn copy_from(state: &mut AppState, record: &Record, kind: CopyKind, now: Instant) -> Vec<Action> {
    let login = record.text("login").filter(|l| !l.is_empty());
    let text = match kind {
        CopyKind::Password => record.password().map(ToString::to_string),
        CopyKind::Login => login.map(ToString::to_string),
        CopyKind::LoginAndPassword => login
            .zip(record.password())
            .map(|(login, password)| format!("{login}:{password}")),
    };

    let Some(text) = text else {
        state.status = Status::warn(match kind {
            CopyKind::Password | CopyKind::LoginAndPassword if record.password().is_none() => {
                missing_password_message(record)
            }
            _ => format!("No login found for '{}'.", record.title()),
        });
        return vec![];
    };

    let secret = SecretString::new(text);
    match state.clipboard.start(&secret, kind, now) {
        Ok(generation) => {
            let seconds = state.clipboard.delay().as_secs();
            state.clipboard_countdown = Some((kind, seconds));
            state.status = Status::info(format!(
                "{} copied. Clearing in {seconds} seconds...",
                kind.label()
            ));
            vec![Action::ScheduleTick {
                generation,
                after: Duration::ZERO,
            }]
        }
        Err(e) => {
            tracing::warn!(error = %e, "clipboard write failed");
            state.status = Status::error(format!("Could not copy to clipboard: {e}"));
            vec![]
        }
    }
}

fn clipboard_tick(state: &mut AppState, generation: u64, now: Instant) -> (bool, Vec<Action>) {
    match state.clipboard.tick(generation, now) {
        Ok(TickOutcome::Stale) => (false, vec![]),
        Ok(TickOutcome::Counting { remaining_secs, next }) => {
            if let Some(exposure) = state.clipboard.active() {
                state.clipboard_countdown = Some((exposure.kind, remaining_secs));
            }
            (true, vec![Action::ScheduleTick { generation, after: next }])
        }
        Ok(TickOutcome::Cleared) => {
            state.clipboard_countdown = None;
            state.status = Status::info("Clipboard cleared. Ready.");
            (true, vec![])
        }
        Err(e) => {
            tracing::warn!(error = %e, "clipboard clear failed, retrying");
            state.status = Status::error(format!("Could not clear clipboard: {e}. Retrying..."));
            (true, vec![Action::ScheduleTick { generation, after: CLEAR_RETRY }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardSink, MAX_CLEAR_DELAY};
    use crate::process::ToolConfig;
    use crate::storage::Settings;
    use crate::ui::Theme;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedSink {
        contents: Arc<Mutex<Option<String>>>,
    }

    impl ClipboardSink for SharedSink {
        fn set_text(&mut self, text: &str) -> Result<()> {
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            *self.contents.lock().unwrap() = None;
            Ok(())
        }
    }

    fn state_with(delay: u64) -> (AppState, SharedSink) {
        let sink = SharedSink::default();
        let settings = Settings {
            clipboard_clear_delay_seconds: delay,
            ..Settings::default()
        };
        let state = AppState::new(Theme::default(), ToolConfig::default(), settings, Box::new(sink.clone()));
        (state, sink)
    }

    fn records(json: &str) -> Vec<Record> {
        serde_json::from_str(json).unwrap()
    }

    fn fetched_seq(actions: &[Action]) -> u64 {
        match actions.last() {
            Some(Action::PostToWorker(WorkerMessage::FetchItems { seq, .. })) => *seq,
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    fn respond(state: &mut AppState, response: WorkerResponse) -> Vec<Action> {
        handle_event(state, &Event::WorkerResponse(response)).unwrap().1
    }

    /// Drives a fresh session to browsing with `items` loaded.
    fn browsing(items: &str) -> (AppState, SharedSink) {
        let (mut state, sink) = state_with(30);
        handle_event(&mut state, &Event::Start).unwrap();
        let actions = respond(
            &mut state,
            WorkerResponse::StatusChecked {
                state: AuthState::Authenticated { identity: "me@x.com".to_string() },
            },
        );
        let seq = fetched_seq(&actions);
        respond(&mut state, WorkerResponse::ItemsFetched { seq, result: Ok(records(items)) });
        assert_eq!(state.phase, SessionPhase::Browsing);
        (state, sink)
    }

    #[test]
    fn start_probes_once() {
        let (mut state, _) = state_with(30);
        let (_, actions) = handle_event(&mut state, &Event::Start).unwrap();
        assert!(matches!(actions[..], [Action::PostToWorker(WorkerMessage::ProbeStatus { .. })]));
        assert_eq!(state.phase, SessionPhase::ProbingStatus);

        let (_, again) = handle_event(&mut state, &Event::Start).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn probe_outcomes_route_to_prompts() {
        let (mut state, _) = state_with(30);
        handle_event(&mut state, &Event::Start).unwrap();
        respond(&mut state, WorkerResponse::StatusChecked { state: AuthState::ToolMissing });
        assert_eq!(state.phase, SessionPhase::ToolMissingPrompt);

        handle_event(&mut state, &Event::RecheckStatus).unwrap();
        respond(
            &mut state,
            WorkerResponse::StatusChecked {
                state: AuthState::Unknown { last_error: "permission denied".to_string() },
            },
        );
        assert!(matches!(
            &state.phase,
            SessionPhase::LoginPrompt { failure: Some(f), .. } if f == "permission denied"
        ));
    }

    #[test]
    fn failed_sync_returns_to_login_prompt() {
        let (mut state, _) = state_with(30);
        handle_event(&mut state, &Event::Start).unwrap();
        respond(
            &mut state,
            WorkerResponse::StatusChecked { state: AuthState::NotAuthenticated { diagnostic: None } },
        );

        let (_, actions) = handle_event(&mut state, &Event::SyncRequested).unwrap();
        assert_eq!(actions[0], Action::SuspendInput);
        assert_eq!(state.phase, SessionPhase::Syncing);

        let (_, again) = handle_event(&mut state, &Event::SyncRequested).unwrap();
        assert!(again.is_empty());

        let actions = respond(
            &mut state,
            WorkerResponse::SyncFinished {
                result: SyncResult::Failure { message: "exit 1".to_string() },
            },
        );
        assert_eq!(actions, [Action::ResumeInput]);
        assert!(matches!(state.phase, SessionPhase::LoginPrompt { failure: Some(_), .. }));
    }

    #[test]
    fn sync_outside_login_prompt_resumes_input() {
        let (mut state, _) = browsing("[]");
        let (_, actions) = handle_event(&mut state, &Event::SyncRequested).unwrap();
        assert_eq!(actions, [Action::ResumeInput]);
        assert_eq!(state.phase, SessionPhase::Browsing);
    }

    #[test]
    fn successful_sync_loads_everything() {
        let (mut state, _) = state_with(30);
        handle_event(&mut state, &Event::Start).unwrap();
        respond(
            &mut state,
            WorkerResponse::StatusChecked { state: AuthState::NotAuthenticated { diagnostic: None } },
        );
        handle_event(&mut state, &Event::SyncRequested).unwrap();
        let actions = respond(
            &mut state,
            WorkerResponse::SyncFinished {
                result: SyncResult::Success { identity: "me@x.com".to_string() },
            },
        );
        assert_eq!(actions[0], Action::ResumeInput);
        assert!(matches!(
            &actions[1],
            Action::PostToWorker(WorkerMessage::FetchItems { term, .. }) if term.is_empty()
        ));
        assert_eq!(state.phase, SessionPhase::Querying);
    }

    #[test]
    fn slow_first_search_never_overwrites_newer_one() {
        let (mut state, _) = browsing("[]");

        let (_, first) = handle_event(&mut state, &Event::Search("ba".to_string())).unwrap();
        let first_seq = fetched_seq(&first);
        let (_, queued) = handle_event(&mut state, &Event::Search("bank".to_string())).unwrap();
        assert!(queued.is_empty());

        let follow = respond(
            &mut state,
            WorkerResponse::ItemsFetched {
                seq: first_seq,
                result: Ok(records(r#"[{"title":"Bahamas"}]"#)),
            },
        );
        assert!(state.records.is_empty());
        let second_seq = fetched_seq(&follow);

        respond(
            &mut state,
            WorkerResponse::ItemsFetched {
                seq: second_seq,
                result: Ok(records(r#"[{"title":"Bank"}]"#)),
            },
        );
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].title(), "Bank");
        assert_eq!(state.history.terms(), ["bank"]);
    }

    #[test]
    fn auth_error_during_query_offers_terminal_check() {
        let (mut state, _) = browsing(r#"[{"title":"A"}]"#);
        let (_, actions) = handle_event(&mut state, &Event::Refresh).unwrap();
        let seq = fetched_seq(&actions);

        respond(&mut state, WorkerResponse::ItemsFetched { seq, result: Err(CliError::TwoFactorRequired) });
        assert!(matches!(
            state.phase,
            SessionPhase::LoginPrompt { offer_terminal_check: true, .. }
        ));

        let (_, actions) = handle_event(&mut state, &Event::OpenTerminalCheck).unwrap();
        assert_eq!(
            actions,
            [Action::LaunchTerminal {
                command: vec!["dcli".to_string(), "accounts".to_string(), "whoami".to_string()]
            }]
        );
    }

    #[test]
    fn generic_query_error_stays_browsing() {
        let (mut state, _) = browsing(r#"[{"title":"A"}]"#);
        let (_, actions) = handle_event(&mut state, &Event::Search("x".to_string())).unwrap();
        let seq = fetched_seq(&actions);
        respond(
            &mut state,
            WorkerResponse::ItemsFetched {
                seq,
                result: Err(CliError::MalformedOutput {
                    error: "expected value".to_string(),
                    snippet: "oops".to_string(),
                }),
            },
        );
        assert_eq!(state.phase, SessionPhase::Browsing);
        assert_eq!(state.status.level, crate::ui::viewmodel::StatusLevel::Error);
        assert!(state.history.is_empty());
    }

    #[test]
    fn details_copy_password_and_countdown_clears_it() {
        let (mut state, sink) = browsing(r#"[{"title":"Site A","login":"a@x.com","password":"p1"}]"#);
        let t0 = Instant::now();

        let (_, actions) = handle_event_at(&mut state, &Event::ShowDetails(0), t0).unwrap();
        let Action::ScheduleTick { generation, .. } = actions[0] else {
            panic!("expected a tick, got {actions:?}");
        };
        assert_eq!(sink.contents.lock().unwrap().as_deref(), Some("p1"));

        let (_, actions) =
            handle_event_at(&mut state, &Event::ClipboardTick { generation }, t0 + Duration::from_secs(1)).unwrap();
        assert!(matches!(actions[..], [Action::ScheduleTick { .. }]));
        assert_eq!(state.clipboard_countdown, Some((CopyKind::Password, 29)));

        handle_event_at(&mut state, &Event::ClipboardTick { generation }, t0 + Duration::from_secs(30)).unwrap();
        assert!(sink.contents.lock().unwrap().is_none());
        assert_eq!(state.status.text, "Clipboard cleared. Ready.");
    }

    #[test]
    fn queries_do_not_cancel_an_exposure() {
        let (mut state, sink) = browsing(r#"[{"title":"Site A","login":"a@x.com","password":"p1"}]"#);
        handle_event(&mut state, &Event::Copy { index: Some(0), kind: CopyKind::LoginAndPassword }).unwrap();
        assert_eq!(sink.contents.lock().unwrap().as_deref(), Some("a@x.com:p1"));

        handle_event(&mut state, &Event::Search("other".to_string())).unwrap();
        assert!(state.clipboard.is_active());
    }

    #[test]
    fn secure_note_has_nothing_to_copy() {
        let (mut state, sink) = browsing(r#"[{"title":"N1","note":"hi"}]"#);
        let (_, actions) = handle_event(&mut state, &Event::ShowDetails(0)).unwrap();
        assert!(actions.is_empty());
        assert!(sink.contents.lock().unwrap().is_none());
        assert_eq!(state.status.text, "'N1' is a Secure Note. No password to display.");
    }

    #[test]
    fn failed_worker_spawn_unblocks_sync() {
        let (mut state, _) = state_with(30);
        handle_event(&mut state, &Event::Start).unwrap();
        respond(
            &mut state,
            WorkerResponse::StatusChecked { state: AuthState::NotAuthenticated { diagnostic: None } },
        );
        handle_event(&mut state, &Event::SyncRequested).unwrap();

        let (_, actions) = handle_event(
            &mut state,
            &Event::ActionFailed { message: "failed to spawn worker".to_string() },
        )
        .unwrap();
        assert_eq!(actions, [Action::ResumeInput]);
        assert!(matches!(state.phase, SessionPhase::LoginPrompt { failure: Some(_), .. }));
    }

    #[test]
    fn quit_clears_the_clipboard() {
        let (mut state, sink) = browsing(r#"[{"title":"A","password":"p"}]"#);
        handle_event(&mut state, &Event::Copy { index: Some(0), kind: CopyKind::Password }).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::Quit).unwrap();
        assert_eq!(actions, [Action::Quit]);
        assert!(sink.contents.lock().unwrap().is_none());
    }

    #[test]
    fn delay_change_restarts_countdown_and_persists() {
        let (mut state, _) = browsing(r#"[{"title":"A","password":"p"}]"#);
        handle_event(&mut state, &Event::Copy { index: Some(0), kind: CopyKind::Password }).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::SetClipboardDelay(5)).unwrap();
        assert!(matches!(actions[0], Action::ScheduleTick { after: Duration::ZERO, .. }));
        match &actions[1] {
            Action::PersistSettings(settings) => assert_eq!(settings.clipboard_clear_delay_seconds, 5),
            other => panic!("expected persist, got {other:?}"),
        }
    }

    #[test]
    fn huge_delay_is_limited_while_a_secret_is_exposed() {
        let (mut state, sink) = browsing(r#"[{"title":"A","password":"p"}]"#);
        handle_event(&mut state, &Event::Copy { index: Some(0), kind: CopyKind::Password }).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::SetClipboardDelay(u64::MAX)).unwrap();
        let limit = MAX_CLEAR_DELAY.as_secs();
        assert!(matches!(actions[0], Action::ScheduleTick { .. }));
        match &actions[1] {
            Action::PersistSettings(settings) => assert_eq!(settings.clipboard_clear_delay_seconds, limit),
            other => panic!("expected persist, got {other:?}"),
        }
        assert_eq!(state.status.text, format!("Clipboard clear delay limited to {limit} seconds."));
        assert_eq!(sink.contents.lock().unwrap().as_deref(), Some("p"));
    }

    #[test]
    fn oversized_saved_delay_does_not_break_copies() {
        let (mut state, sink) = state_with(u64::MAX);
        handle_event(&mut state, &Event::Start).unwrap();
        let actions = respond(
            &mut state,
            WorkerResponse::StatusChecked {
                state: AuthState::Authenticated { identity: "me@x.com".to_string() },
            },
        );
        let seq = fetched_seq(&actions);
        respond(&mut state, WorkerResponse::ItemsFetched { seq, result: Ok(records(r#"[{"title":"A","password":"p"}]"#)) });

        handle_event(&mut state, &Event::Copy { index: Some(0), kind: CopyKind::Password }).unwrap();
        assert_eq!(sink.contents.lock().unwrap().as_deref(), Some("p"));
        assert_eq!(state.clipboard_countdown, Some((CopyKind::Password, MAX_CLEAR_DELAY.as_secs())));
    }

    #[test]
    fn clearing_history_persists_empty_list() {
        let (mut state, _) = browsing("[]");
        state.history.record("bank");
        let (_, actions) = handle_event(&mut state, &Event::ClearHistory).unwrap();
        match &actions[..] {
            [Action::PersistSettings(settings)] => assert!(settings.search_history.is_empty()),
            other => panic!("expected persist, got {other:?}"),
        }
        assert_eq!(state.status.text, "Search history cleared!");
    }

    #[test]
    fn saved_window_geometry_is_carried_through() {
        let window = crate::storage::WindowGeometry { x: -40, y: 12, width: 1280, height: 900 };
        let sink = SharedSink::default();
        let settings = Settings { window, ..Settings::default() };
        let mut state = AppState::new(Theme::default(), ToolConfig::default(), settings, Box::new(sink));
        state.history.record("bank");

        let (_, actions) = handle_event(&mut state, &Event::SetClipboardDelay(9)).unwrap();
        match actions.last() {
            Some(Action::PersistSettings(settings)) => assert_eq!(settings.window, window),
            other => panic!("expected persist, got {other:?}"),
        }
        let (_, actions) = handle_event(&mut state, &Event::ClearHistory).unwrap();
        match &actions[..] {
            [Action::PersistSettings(settings)] => assert_eq!(settings.window, window),
            other => panic!("expected persist, got {other:?}"),
        }
    }
}
