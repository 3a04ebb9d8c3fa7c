use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use feascheck_engine::error::FeasError;
use feascheck_engine::model::{
    Table, FIELD_CITY, FIELD_DONE_BY, FIELD_PINCODE, FIELD_STATE, FIELD_STATUS,
};
use feascheck_engine::normalize::{ensure_and_clean, normalize_headers};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS master (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    city TEXT NOT NULL DEFAULT '',
    state TEXT NOT NULL DEFAULT '',
    pincode TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT '',
    done_by TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS master_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

const CANONICAL_COLUMNS: [&str; 5] =
    [FIELD_CITY, FIELD_STATE, FIELD_PINCODE, FIELD_STATUS, FIELD_DONE_BY];

/// The authoritative master dataset behind a single replace/resolve surface.
///
/// Writes go to both backends: the SQLite record store (inside one
/// transaction) and a flat-file xlsx mirror (written to a temp path, then
/// renamed over the old file). A concurrent reader sees either the old or
/// the new master in full, never a torn one.
pub struct MasterRepository {
    db_path: PathBuf,
    cache_path: PathBuf,
}

impl MasterRepository {
    pub fn new(db_path: impl Into<PathBuf>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            cache_path: cache_path.into(),
        }
    }

    fn open(&self) -> Result<Connection, FeasError> {
        let conn =
            Connection::open(&self.db_path).map_err(|e| FeasError::Storage(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| FeasError::Storage(e.to_string()))?;
        Ok(conn)
    }

    /// Full delete-and-replace of the persisted master. `table` must carry
    /// the canonical column set (see `CheckConfig::project_master`); missing
    /// canonical columns are stored as empty strings.
    ///
    /// Returns the number of rows stored.
    pub fn replace(&self, table: &Table) -> Result<usize, FeasError> {
        let conn = self.open()?;
        let err = |e: rusqlite::Error| FeasError::Storage(e.to_string());

        let col_idx: Vec<Option<usize>> = CANONICAL_COLUMNS
            .iter()
            .map(|c| table.column_index(c))
            .collect();

        conn.execute("BEGIN TRANSACTION", []).map_err(err)?;
        conn.execute("DELETE FROM master", []).map_err(err)?;

        {
            let mut stmt = conn
                .prepare(
                    "INSERT INTO master (city, state, pincode, status, done_by)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(err)?;

            for row in 0..table.row_count() {
                let cell = |idx: &Option<usize>| -> &str {
                    idx.map(|c| table.cell(row, c)).unwrap_or("")
                };
                stmt.execute(params![
                    cell(&col_idx[0]),
                    cell(&col_idx[1]),
                    cell(&col_idx[2]),
                    cell(&col_idx[3]),
                    cell(&col_idx[4]),
                ])
                .map_err(err)?;
            }
        }

        conn.execute(
            "INSERT OR REPLACE INTO master_meta (key, value) VALUES ('replaced_at', ?1)",
            params![chrono::Utc::now().to_rfc3339()],
        )
        .map_err(err)?;
        conn.execute(
            "INSERT OR REPLACE INTO master_meta (key, value) VALUES ('row_count', ?1)",
            params![table.row_count().to_string()],
        )
        .map_err(err)?;

        conn.execute("COMMIT", []).map_err(err)?;

        self.write_cache_mirror(table)?;

        Ok(table.row_count())
    }

    /// Write the flat-file mirror via temp file + rename so readers never
    /// observe a half-written cache.
    fn write_cache_mirror(&self, table: &Table) -> Result<(), FeasError> {
        let tmp_path = self.cache_path.with_extension("xlsx.tmp");
        feascheck_io::xlsx::write_table(table, &tmp_path, "Master")
            .map_err(FeasError::Sheet)?;
        std::fs::rename(&tmp_path, &self.cache_path).map_err(|e| FeasError::Io(e.to_string()))?;
        Ok(())
    }

    /// Produce the normalized, cleaned master table.
    ///
    /// Resolution order: the cached flat file if it exists, else the record
    /// store. Both absent/empty is `NoMasterData`.
    pub fn resolve(&self) -> Result<Table, FeasError> {
        if self.cache_path.exists() {
            let mut table =
                feascheck_io::xlsx::import_table(&self.cache_path).map_err(FeasError::Sheet)?;
            if !table.is_empty() {
                Self::clean(&mut table);
                return Ok(table);
            }
        }

        let mut table = self.load_store()?;
        if table.is_empty() {
            return Err(FeasError::NoMasterData);
        }
        Self::clean(&mut table);
        Ok(table)
    }

    fn clean(table: &mut Table) {
        normalize_headers(table);
        ensure_and_clean(table, &[FIELD_CITY, FIELD_STATE, FIELD_PINCODE]);
    }

    fn load_store(&self) -> Result<Table, FeasError> {
        if !self.db_path.exists() {
            return Ok(Table::default());
        }
        let conn = self.open()?;
        let err = |e: rusqlite::Error| FeasError::Storage(e.to_string());

        let mut stmt = conn
            .prepare("SELECT city, state, pincode, status, done_by FROM master ORDER BY id")
            .map_err(err)?;

        let mut table = Table::new(CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect());
        let rows = stmt
            .query_map([], |row| {
                Ok(vec![
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ])
            })
            .map_err(err)?;

        for row in rows {
            table.push_row(row.map_err(err)?);
        }

        Ok(table)
    }

    /// Timestamp of the last replace, if any.
    pub fn replaced_at(&self) -> Result<Option<String>, FeasError> {
        if !self.db_path.exists() {
            return Ok(None);
        }
        let conn = self.open()?;
        let value = conn
            .query_row(
                "SELECT value FROM master_meta WHERE key = 'replaced_at'",
                [],
                |row| row.get::<_, String>(0),
            )
            .ok();
        Ok(value)
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}
