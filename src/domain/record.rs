//! Vault records as returned by `dcli password list --output json`.
//!
//! The tool emits loosely-shaped JSON objects. No schema is imposed beyond the
//! handful of optional fields used for display, deduplication and
//! classification, so a [`Record`] is a thin wrapper over the raw JSON object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Title shown when a record carries no `title` field.
pub const NO_TITLE: &str = "No Title";

/// Login shown when a record carries no `login` field.
pub const NO_LOGIN: &str = "No Login";

/// One item from the vault.
///
/// Records are produced by the query engine and treated as read-only
/// afterwards. `Debug` output never includes field values other than the
/// title, so records can be traced safely.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wraps an already-parsed JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the raw value of a field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns `true` if the key exists, whatever its value.
    #[must_use]
    pub fn has_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the field as text when it is a JSON string.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns `true` when the field is present, not null and not `""`.
    ///
    /// Used for `note`, where any non-empty value counts.
    #[must_use]
    pub fn has_non_empty(&self, name: &str) -> bool {
        match self.0.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Returns `true` when the field holds a truthy value.
    ///
    /// Strings, arrays and objects are truthy when non-empty; numbers when
    /// non-zero; booleans when `true`; null never.
    #[must_use]
    pub fn is_truthy(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(truthy)
    }

    /// Display title, falling back to [`NO_TITLE`].
    #[must_use]
    pub fn title(&self) -> &str {
        self.text("title").unwrap_or(NO_TITLE)
    }

    /// Display login, falling back to [`NO_LOGIN`].
    #[must_use]
    pub fn login(&self) -> &str {
        self.text("login").unwrap_or(NO_LOGIN)
    }

    /// The password, only when it is a non-empty string.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.text("password").filter(|p| !p.is_empty())
    }

    /// Identifier used for deduplication.
    ///
    /// Strings are used verbatim and numbers by their JSON text; null or any
    /// other shape counts as "no id".
    #[must_use]
    pub fn id_key(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Number of fields carried by the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a record with no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("title", &self.title())
            .field("keys", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
