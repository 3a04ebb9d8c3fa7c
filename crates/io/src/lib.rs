// Tabular file I/O: CSV/TSV import, Excel import, result export.

pub mod csv;
pub mod xlsx;

use std::path::Path;

use feascheck_engine::error::FeasError;
use feascheck_engine::model::Table;

/// Load a tabular file, dispatching on extension.
///
/// Recognized: `csv`, `tsv`, `xls`, `xlsx` (case-insensitive). Anything
/// else (including no extension) is an `UnsupportedFileType` error.
pub fn load_table(path: &Path) -> Result<Table, FeasError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => csv::import_table(path).map_err(FeasError::Io),
        "tsv" => csv::import_table_tsv(path).map_err(FeasError::Io),
        "xls" | "xlsx" => xlsx::import_table(path).map_err(FeasError::Sheet),
        other => Err(FeasError::UnsupportedFileType(other.to_string())),
    }
}
