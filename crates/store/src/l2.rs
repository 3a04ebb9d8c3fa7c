use std::path::PathBuf;

use rusqlite::{params, params_from_iter, Connection};

use feascheck_engine::error::FeasError;
use feascheck_engine::model::Table;
use feascheck_engine::normalize::normalize_header;

/// Fixed L2 master column set, in storage order.
pub const L2_COLUMNS: [&str; 12] = [
    "VivaCKTID",
    "CustomerName",
    "Address",
    "Pincode",
    "Location",
    "State",
    "BW",
    "Media",
    "BBName",
    "BBContact",
    "OTC",
    "MRC",
];

/// Columns consulted by free-text search.
const SEARCH_COLUMNS: [&str; 6] = [
    "VivaCKTID",
    "Pincode",
    "Location",
    "State",
    "CustomerName",
    "BBName",
];

/// Maximum rows returned by one search.
pub const SEARCH_LIMIT: usize = 200;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS l2_master (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    VivaCKTID TEXT NOT NULL DEFAULT '',
    CustomerName TEXT NOT NULL DEFAULT '',
    Address TEXT NOT NULL DEFAULT '',
    Pincode TEXT NOT NULL DEFAULT '',
    Location TEXT NOT NULL DEFAULT '',
    State TEXT NOT NULL DEFAULT '',
    BW TEXT NOT NULL DEFAULT '',
    Media TEXT NOT NULL DEFAULT '',
    BBName TEXT NOT NULL DEFAULT '',
    BBContact TEXT NOT NULL DEFAULT '',
    OTC TEXT NOT NULL DEFAULT '',
    MRC TEXT NOT NULL DEFAULT ''
);
"#;

/// The L2 master list: full-replace ingestion plus capped substring search.
pub struct L2Store {
    db_path: PathBuf,
}

impl L2Store {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    fn open(&self) -> Result<Connection, FeasError> {
        let conn =
            Connection::open(&self.db_path).map_err(|e| FeasError::Storage(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| FeasError::Storage(e.to_string()))?;
        Ok(conn)
    }

    /// Full delete-and-replace from an uploaded table. Source columns are
    /// matched to the fixed L2 set by normalized header ("Customer Name"
    /// and "CustomerName" both match). Unmatched L2 columns store empty.
    pub fn replace(&self, table: &Table) -> Result<usize, FeasError> {
        let conn = self.open()?;
        let err = |e: rusqlite::Error| FeasError::Storage(e.to_string());

        let normalized: Vec<String> =
            table.columns.iter().map(|c| normalize_header(c)).collect();
        let col_idx: Vec<Option<usize>> = L2_COLUMNS
            .iter()
            .map(|l2| {
                let target = normalize_header(l2);
                normalized
                    .iter()
                    .position(|c| c.replace(' ', "") == target.replace(' ', ""))
            })
            .collect();

        conn.execute("BEGIN TRANSACTION", []).map_err(err)?;
        conn.execute("DELETE FROM l2_master", []).map_err(err)?;

        {
            let placeholders: Vec<String> =
                (1..=L2_COLUMNS.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "INSERT INTO l2_master ({}) VALUES ({})",
                L2_COLUMNS.join(", "),
                placeholders.join(", ")
            );
            let mut stmt = conn.prepare(&sql).map_err(err)?;

            for row in 0..table.row_count() {
                let values: Vec<String> = col_idx
                    .iter()
                    .map(|idx| {
                        idx.map(|c| table.cell(row, c).trim().to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                stmt.execute(params_from_iter(values.iter())).map_err(err)?;
            }
        }

        conn.execute("COMMIT", []).map_err(err)?;
        Ok(table.row_count())
    }

    /// Case-insensitive substring search across the fixed search field set,
    /// capped at `SEARCH_LIMIT` rows. An empty query returns the first
    /// `SEARCH_LIMIT` rows.
    pub fn search(&self, query: &str) -> Result<Table, FeasError> {
        let mut table = Table::new(L2_COLUMNS.iter().map(|c| c.to_string()).collect());
        if !self.db_path.exists() {
            return Ok(table);
        }

        let conn = self.open()?;
        let err = |e: rusqlite::Error| FeasError::Storage(e.to_string());

        let clauses: Vec<String> = SEARCH_COLUMNS
            .iter()
            .map(|c| format!("lower({c}) LIKE ?1 ESCAPE '\\'"))
            .collect();
        let sql = format!(
            "SELECT {} FROM l2_master WHERE {} ORDER BY id LIMIT {}",
            L2_COLUMNS.join(", "),
            clauses.join(" OR "),
            SEARCH_LIMIT
        );

        let pattern = format!("%{}%", escape_like(&query.trim().to_lowercase()));

        let mut stmt = conn.prepare(&sql).map_err(err)?;
        let rows = stmt
            .query_map(params![pattern], |row| {
                (0..L2_COLUMNS.len())
                    .map(|i| row.get::<_, String>(i))
                    .collect::<Result<Vec<String>, _>>()
            })
            .map_err(err)?;

        for row in rows {
            table.push_row(row.map_err(err)?);
        }

        Ok(table)
    }
}

/// Escape LIKE wildcards so they match literally in user queries.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
