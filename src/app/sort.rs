//! Column sorting for the item table.

use crate::domain::{classify, Record};
use std::collections::HashMap;

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Login,
    Type,
}

impl Column {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Login => "Login",
            Self::Type => "Type",
        }
    }

    /// Parses the column names accepted on the command line.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" | "t" => Some(Self::Title),
            "login" | "l" => Some(Self::Login),
            "type" | "y" => Some(Self::Type),
            _ => None,
        }
    }

    /// Sort key of `record` for this column.
    ///
    /// Title and login compare case-folded; type compares by category label.
    #[must_use]
    pub fn key(self, record: &Record) -> String {
        match self {
            Self::Title => record.title().to_lowercase(),
            Self::Login => record.login().to_lowercase(),
            Self::Type => classify(record).label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ascending => "Ascending",
            Self::Descending => "Descending",
        }
    }

    #[must_use]
    pub const fn arrow(self) -> char {
        match self {
            Self::Ascending => '▲',
            Self::Descending => '▼',
        }
    }

    const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Per-column sort direction memory.
///
/// Each column toggles independently: the first sort on a column is
/// ascending, every further sort on the same column flips it.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    directions: HashMap<Column, Direction>,
    current: Option<Column>,
}

impl SortState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts `records` by `column` in its next direction and returns that
    /// direction. The sort is stable, so equal keys keep their relative order.
    pub fn apply(&mut self, records: &mut [Record], column: Column) -> Direction {
        let direction = self
            .directions
            .get(&column)
            .map_or(Direction::Ascending, |d| d.flipped());
        self.directions.insert(column, direction);
        self.current = Some(column);

        sort_records(records, column, direction);
        direction
    }

    /// Re-applies the current sort without toggling, for freshly loaded rows.
    pub fn reapply(&self, records: &mut [Record]) {
        if let Some((column, direction)) = self.current() {
            sort_records(records, column, direction);
        }
    }

    /// The column and direction of the most recent sort.
    #[must_use]
    pub fn current(&self) -> Option<(Column, Direction)> {
        let column = self.current?;
        self.directions.get(&column).map(|d| (column, *d))
    }

    /// Forgets the active column but keeps per-column direction memory.
    pub fn reset_current(&mut self) {
        self.current = None;
    }
}

fn sort_records(records: &mut [Record], column: Column, direction: Direction) {
    let mut keyed: Vec<(String, Record)> = records
        .iter()
        .map(|r| (column.key(r), r.clone()))
        .collect();
    match direction {
        Direction::Ascending => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        Direction::Descending => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }
    for (slot, (_, record)) in records.iter_mut().zip(keyed) {
        *slot = record;
    }
}
