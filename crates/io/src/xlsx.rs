// Excel import (xlsx, xls) and export (xlsx only)
//
// Import: first sheet only, all cells read as strings.
// Export: one-way result snapshot, not a round-trip format.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use feascheck_engine::model::Table;

/// Sheet name used for exported feasibility results.
pub const RESULT_SHEET_NAME: &str = "Result";

/// Import the first sheet of an Excel file as a string-typed table.
/// The first row is the header row.
pub fn import_table(path: &Path) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("failed to open Excel file: {e}"))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("failed to read sheet '{first}': {e}"))?;

    let mut rows = range.rows();

    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(cell_to_string).collect());
    }

    Ok(table)
}

/// Convert one calamine cell to its string form. Whole floats print without
/// a fractional part so numeric pincodes survive as digit strings.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

/// Write a table to an xlsx file with the given sheet name: bold header row,
/// then data rows.
pub fn write_table(table: &Table, path: &Path, sheet_name: &str) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| format!("failed to create sheet '{sheet_name}': {e}"))?;

    let header_format = Format::new().set_bold();
    for (col, name) in table.columns.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, name.as_str(), &header_format)
            .map_err(|e| format!("failed to write header: {e}"))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write((row_idx + 1) as u32, col as u16, value.as_str())
                .map_err(|e| format!("failed to write row {row_idx}: {e}"))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| format!("failed to save xlsx file: {e}"))?;

    Ok(())
}

/// Export an annotated result table to the `"Result"` sheet.
pub fn export_result(table: &Table, path: &Path) -> Result<(), String> {
    write_table(table, path, RESULT_SHEET_NAME)
}
