use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An ordered set of named columns over ordered rows of string cells.
///
/// All cells are strings; missing cells are empty strings. Rows pushed with
/// fewer cells than columns are padded, longer rows are truncated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Append a column, filling every existing row with `fill`.
    /// Returns the new column's index.
    pub fn add_column(&mut self, name: &str, fill: &str) -> usize {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.to_string());
        }
        self.columns.len() - 1
    }

    /// Cell value, or "" for an out-of-range column (ragged safety net).
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row].get(col).map(String::as_str).unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Composite keys
// ---------------------------------------------------------------------------

/// Geographic match key: (city, pincode). Struct fields are compared
/// directly as hash-map keys, so no separator escaping is ever needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoKey {
    pub city: String,
    pub pincode: String,
}

/// Exact match key: (city, state, pincode).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoStateKey {
    pub city: String,
    pub state: String,
    pub pincode: String,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifier output for one raw status string. `Unknown` means the value
/// carried no usable status; the engine falls back to the next tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Feasible,
    NotFeasible,
    Wip,
    Unknown,
}

impl StatusClass {
    /// The verdict this class maps to, or `None` for `Unknown`.
    pub fn verdict(self) -> Option<Verdict> {
        match self {
            Self::Feasible => Some(Verdict::Feasible),
            Self::NotFeasible => Some(Verdict::NotFeasible),
            Self::Wip => Some(Verdict::Wip),
            Self::Unknown => None,
        }
    }
}

/// Final per-row feasibility outcome. Display strings are the exact cell
/// values written to the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Feasible,
    NotFeasible,
    Wip,
    NoMatchFound,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Feasible => write!(f, "Feasible"),
            Self::NotFeasible => write!(f, "Not Feasible"),
            Self::Wip => write!(f, "WIP"),
            Self::NoMatchFound => write!(f, "No Match Found"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub total_rows: usize,
    pub feasible: usize,
    pub not_feasible: usize,
    pub wip: usize,
    pub no_match: usize,
    pub verdict_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckMeta {
    pub mode: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Annotated output: the input table plus one verdict column, with meta
/// and summary for machine-readable reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub meta: CheckMeta,
    pub summary: CheckSummary,
    pub table: Table,
}

// ---------------------------------------------------------------------------
// Canonical field names
// ---------------------------------------------------------------------------

pub const FIELD_CITY: &str = "city";
pub const FIELD_STATE: &str = "state";
pub const FIELD_PINCODE: &str = "pincode";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_DONE_BY: &str = "done_by";

/// Verdict column name in simple-mode output.
pub const SIMPLE_VERDICT_COLUMN: &str = "Status";
/// Verdict column name in advanced-mode output.
pub const ADVANCED_VERDICT_COLUMN: &str = "FinalStatus";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_row_pads_and_truncates() {
        let mut t = Table::new(vec!["a".into(), "b".into(), "c".into()]);
        t.push_row(vec!["1".into()]);
        t.push_row(vec!["1".into(), "2".into(), "3".into(), "4".into()]);
        assert_eq!(t.rows[0], vec!["1", "", ""]);
        assert_eq!(t.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn add_column_fills_existing_rows() {
        let mut t = Table::new(vec!["a".into()]);
        t.push_row(vec!["1".into()]);
        let idx = t.add_column("b", "");
        assert_eq!(idx, 1);
        assert_eq!(t.cell(0, 1), "");
    }

    #[test]
    fn verdict_display_strings() {
        assert_eq!(Verdict::Feasible.to_string(), "Feasible");
        assert_eq!(Verdict::NotFeasible.to_string(), "Not Feasible");
        assert_eq!(Verdict::Wip.to_string(), "WIP");
        assert_eq!(Verdict::NoMatchFound.to_string(), "No Match Found");
    }

    #[test]
    fn unknown_class_has_no_verdict() {
        assert_eq!(StatusClass::Unknown.verdict(), None);
        assert_eq!(StatusClass::Wip.verdict(), Some(Verdict::Wip));
    }
}
