use serde::{Deserialize, Serialize};

use crate::error::FeasError;
use crate::model::{Table, FIELD_CITY, FIELD_DONE_BY, FIELD_PINCODE, FIELD_STATE, FIELD_STATUS};
use crate::normalize::normalize_header;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Simple,
    Advanced,
}

impl Mode {
    /// Parse a caller-supplied mode string. Absent or unrecognized values
    /// fall back to advanced.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("simple") => Self::Simple,
            Some("advanced") => Self::Advanced,
            _ => Self::Advanced,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// One canonical field and the substrings that identify its source column.
/// Evaluated in declaration order; the first matching source column wins.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnAlias {
    pub field: String,
    pub candidates: Vec<String>,
}

fn default_column_map() -> Vec<ColumnAlias> {
    let alias = |field: &str, candidates: &[&str]| ColumnAlias {
        field: field.to_string(),
        candidates: candidates.iter().map(|c| c.to_string()).collect(),
    };
    vec![
        alias(FIELD_CITY, &["city", "location"]),
        alias(FIELD_STATE, &["state"]),
        alias(FIELD_PINCODE, &["pincode", "pin"]),
        alias(FIELD_STATUS, &["status"]),
        alias(FIELD_DONE_BY, &["done by", "prepared", "report from"]),
    ]
}

/// Header text as used for candidate matching: normalized, then stripped of
/// everything outside `[a-z0-9 ]`.
fn clean_for_matching(header: &str) -> String {
    normalize_header(header)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    /// Mode used when the caller supplies none.
    #[serde(default = "default_mode")]
    pub default_mode: Mode,
    /// Directory for exported result files; defaults to the working dir.
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Master-ingestion column aliases, in match-priority order.
    #[serde(default = "default_column_map")]
    pub column_map: Vec<ColumnAlias>,
}

fn default_mode() -> Mode {
    Mode::Advanced
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::Advanced,
            output_dir: None,
            column_map: default_column_map(),
        }
    }
}

impl CheckConfig {
    pub fn from_toml(input: &str) -> Result<Self, FeasError> {
        toml::from_str(input).map_err(|e| FeasError::ConfigParse(e.to_string()))
    }

    /// Resolve each aliased field to a source column index in `table`.
    /// Returns (canonical field, column index) pairs for matched fields only.
    pub fn match_columns(&self, table: &Table) -> Vec<(String, usize)> {
        let cleaned: Vec<String> =
            table.columns.iter().map(|c| clean_for_matching(c)).collect();

        let mut matched = Vec::new();
        for alias in &self.column_map {
            let hit = cleaned.iter().position(|clean| {
                alias.candidates.iter().any(|cand| clean.contains(cand.as_str()))
            });
            if let Some(idx) = hit {
                matched.push((alias.field.clone(), idx));
            }
        }
        matched
    }

    /// Project an uploaded master table onto the canonical field set.
    /// Unmatched fields become empty columns; values are trimmed.
    pub fn project_master(&self, table: &Table) -> Table {
        let matched = self.match_columns(table);

        let mut out = Table::new(
            self.column_map.iter().map(|a| a.field.clone()).collect(),
        );
        for row in 0..table.row_count() {
            let cells = self
                .column_map
                .iter()
                .map(|alias| {
                    matched
                        .iter()
                        .find(|(field, _)| field == &alias.field)
                        .map(|&(_, col)| table.cell(row, col).trim().to_string())
                        .unwrap_or_default()
                })
                .collect();
            out.push_row(cells);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mode_defaults_to_advanced() {
        assert_eq!(Mode::parse(None), Mode::Advanced);
        assert_eq!(Mode::parse(Some("bogus")), Mode::Advanced);
        assert_eq!(Mode::parse(Some("SIMPLE")), Mode::Simple);
        assert_eq!(Mode::parse(Some(" advanced ")), Mode::Advanced);
    }

    #[test]
    fn default_config_has_builtin_aliases() {
        let config = CheckConfig::default();
        assert_eq!(config.default_mode, Mode::Advanced);
        assert_eq!(config.column_map.len(), 5);
        assert_eq!(config.column_map[0].field, "city");
    }

    #[test]
    fn parse_toml_overrides() {
        let input = r#"
default_mode = "simple"
output_dir = "exports"

[[column_map]]
field = "city"
candidates = ["town"]

[[column_map]]
field = "pincode"
candidates = ["zip"]
"#;
        let config = CheckConfig::from_toml(input).unwrap();
        assert_eq!(config.default_mode, Mode::Simple);
        assert_eq!(config.output_dir.as_deref(), Some("exports"));
        assert_eq!(config.column_map.len(), 2);
        assert_eq!(config.column_map[1].candidates, vec!["zip"]);
    }

    #[test]
    fn parse_toml_rejects_bad_mode() {
        let err = CheckConfig::from_toml("default_mode = \"simpel\"");
        assert!(err.is_err(), "typo in mode should fail deserialization");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = CheckConfig::from_toml("").unwrap();
        assert_eq!(config.column_map.len(), 5);
        assert_eq!(config.default_mode, Mode::Advanced);
    }

    fn upload(cols: &[&str], row: &[&str]) -> Table {
        let mut t = Table::new(cols.iter().map(|c| c.to_string()).collect());
        t.push_row(row.iter().map(|c| c.to_string()).collect());
        t
    }

    #[test]
    fn match_columns_by_substring() {
        let config = CheckConfig::default();
        let t = upload(
            &["sl no", "nni location", "pin code", "report from team"],
            &["1", "Pune", "411001", "ops"],
        );
        let matched = config.match_columns(&t);
        // "nni location" matches city via "location", "pin code" via "pin",
        // "report from team" matches done_by via "report from".
        assert!(matched.contains(&("city".into(), 1)));
        assert!(matched.contains(&("pincode".into(), 2)));
        assert!(matched.contains(&("done_by".into(), 3)));
        assert!(!matched.iter().any(|(f, _)| f == "state"));
    }

    #[test]
    fn project_master_fills_unmatched_fields() {
        let config = CheckConfig::default();
        let t = upload(&["City", "Pincode"], &[" Pune ", "411001"]);
        let projected = config.project_master(&t);
        assert_eq!(
            projected.columns,
            vec!["city", "state", "pincode", "status", "done_by"]
        );
        assert_eq!(projected.rows[0], vec!["Pune", "", "411001", "", ""]);
    }
}
