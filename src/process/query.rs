//! Fetching vault records and keeping overlapping searches in order.
//!
//! [`QueryEngine`] performs one `dcli password list` call and turns its outcome
//! into records or a [`CliError`]. [`QueryTracker`] lives on the foreground and
//! makes sure that at most one query runs at a time and that only the newest
//! request's result is ever displayed.

use super::executor::{CommandOutcome, CommandRunner};
use super::tool::ToolConfig;
use crate::domain::error::bounded_snippet;
use crate::domain::{CliError, Record};
use std::collections::HashMap;
use std::sync::Arc;

/// Runs list queries against `dcli`.
#[derive(Clone)]
pub struct QueryEngine {
    runner: Arc<dyn CommandRunner>,
    tool: ToolConfig,
}

impl QueryEngine {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, tool: ToolConfig) -> Self {
        Self { runner, tool }
    }

    /// Fetches records matching `term`, or everything for an empty term.
    ///
    /// Results keep the tool's order after [`dedup`].
    ///
    /// # Errors
    ///
    /// Returns the [`CliError`] describing why the call failed or why its
    /// output could not be used.
    pub fn fetch(&self, term: &str) -> Result<Vec<Record>, CliError> {
        let _span = tracing::info_span!("fetch_items", broad = term.is_empty()).entered();

        let outcome = self.runner.run(&self.tool.list_command(term));
        if !outcome.succeeded() || outcome.not_found || outcome.spawn_error.is_some() {
            let error = classify_failure(&outcome, self.tool.list_timeout.as_secs());
            tracing::warn!(error = %error.title(), "list query failed");
            return Err(error);
        }

        let records = parse_records(&outcome.stdout)?;
        let raw_count = records.len();
        let unique = dedup(records);
        tracing::info!(raw_count, unique_count = unique.len(), "list query returned");
        Ok(unique)
    }
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}

/// Maps an unsuccessful outcome onto the error taxonomy.
///
/// Authentication and two-factor detection is a case-insensitive substring
/// match on the error stream. It is advisory only. Any error text kept in the
/// result is cut to a bounded snippet.
#[must_use]
pub fn classify_failure(outcome: &CommandOutcome, timeout_secs: u64) -> CliError {
    if outcome.not_found {
        return CliError::ToolNotFound;
    }
    if let Some(error) = &outcome.spawn_error {
        return CliError::GenericExternalFailure {
            exit_code: None,
            stderr: bounded_snippet(error),
        };
    }
    if outcome.timed_out {
        return CliError::Timeout { seconds: timeout_secs };
    }

    let stderr = outcome.stderr.to_lowercase();
    if stderr.contains("authentication required") || stderr.contains("not logged in") {
        CliError::AuthRequired
    } else if stderr.contains("2fa") || stderr.contains("two-factor") {
        CliError::TwoFactorRequired
    } else {
        CliError::GenericExternalFailure {
            exit_code: outcome.exit_code,
            stderr: bounded_snippet(&outcome.stderr),
        }
    }
}

/// Parses the list command's standard output as a JSON array of objects.
///
/// # Errors
///
/// Returns [`CliError::MalformedOutput`] with a bounded snippet of the output
/// when it is not a JSON array of objects.
pub fn parse_records(stdout: &str) -> Result<Vec<Record>, CliError> {
    serde_json::from_str::<Vec<Record>>(stdout).map_err(|e| CliError::MalformedOutput {
        error: e.to_string(),
        snippet: bounded_snippet(stdout),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Id(String),
    Composite {
        title: Option<String>,
        login: Option<String>,
        note: Option<String>,
    },
}

impl DedupKey {
    fn of(record: &Record) -> Self {
        record.id_key().map_or_else(
            || {
                let raw = |name| record.field(name).map(ToString::to_string);
                Self::Composite {
                    title: raw("title"),
                    login: raw("login"),
                    note: raw("note"),
                }
            },
            Self::Id,
        )
    }
}

/// Collapses duplicate records.
///
/// Records are keyed by `id` when present, otherwise by their raw
/// `(title, login, note)`. Each key keeps the position of its first occurrence
/// and the value of its last occurrence.
///
/// # Examples
///
/// ```
/// use dashview::domain::Record;
/// use dashview::process::query::dedup;
///
/// let records: Vec<Record> = serde_json::from_str(
///     r#"[{"id":"1","title":"A"},{"id":"2","title":"B"},{"id":"1","title":"A2"}]"#,
/// ).unwrap();
/// let unique = dedup(records);
/// assert_eq!(unique.len(), 2);
/// assert_eq!(unique[0].title(), "A2");
/// ```
#[must_use]
pub fn dedup(records: Vec<Record>) -> Vec<Record> {
    let mut positions: HashMap<DedupKey, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<Record> = Vec::with_capacity(records.len());

    for record in records {
        let key = DedupKey::of(&record);
        if let Some(&index) = positions.get(&key) {
            unique[index] = record;
        } else {
            positions.insert(key, unique.len());
            unique.push(record);
        }
    }

    unique
}

/// A query the foreground should hand to a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    pub term: String,
}

/// What to do with a result that just arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    /// The result answers the newest request; display it.
    Current { term: String },
    /// A newer request was waiting. Drop this result and dispatch the ticket.
    Superseded { follow_up: QueryTicket },
    /// Not the query in flight. Ignore it.
    Stale,
}

/// Single-flight bookkeeping for list queries.
///
/// Every dispatched query gets a strictly increasing sequence number. While a
/// query runs, newer requests replace each other in a one-slot queue, so a
/// burst of searches runs at most two queries: the one in flight and the
/// latest one requested.
#[derive(Debug, Default)]
pub struct QueryTracker {
    last_seq: u64,
    in_flight: Option<QueryTicket>,
    pending: Option<String>,
}

impl QueryTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a query for `term`.
    ///
    /// Returns a ticket to dispatch now, or `None` when the request was queued
    /// behind the query in flight.
    pub fn request(&mut self, term: &str) -> Option<QueryTicket> {
        if self.in_flight.is_some() {
            tracing::debug!("query in flight, queueing newest request");
            self.pending = Some(term.to_string());
            return None;
        }
        Some(self.issue(term.to_string()))
    }

    /// Reports that the result tagged `seq` arrived.
    pub fn accept(&mut self, seq: u64) -> Acceptance {
        match &self.in_flight {
            Some(ticket) if ticket.seq == seq => {}
            _ => {
                tracing::debug!(seq, latest = self.last_seq, "discarding stale query result");
                return Acceptance::Stale;
            }
        }

        let finished = self.in_flight.take();
        if let Some(term) = self.pending.take() {
            return Acceptance::Superseded {
                follow_up: self.issue(term),
            };
        }
        finished.map_or(Acceptance::Stale, |ticket| Acceptance::Current { term: ticket.term })
    }

    /// Forgets the query in flight and anything queued. Results that arrive
    /// afterwards are stale.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.pending = None;
    }

    /// Returns `true` while a query is outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Sequence number of the most recently dispatched query.
    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.last_seq
    }

    fn issue(&mut self, term: String) -> QueryTicket {
        self.last_seq += 1;
        let ticket = QueryTicket {
            seq: self.last_seq,
            term,
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }
}
