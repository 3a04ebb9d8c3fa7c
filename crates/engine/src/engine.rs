use crate::classify::classify_status;
use crate::config::Mode;
use crate::error::FeasError;
use crate::matcher::{dedup_geo, dedup_geo_state, KeyColumns};
use crate::model::{
    CheckMeta, CheckResult, StatusClass, Table, Verdict, ADVANCED_VERDICT_COLUMN, FIELD_CITY,
    FIELD_PINCODE, FIELD_STATE, FIELD_STATUS, SIMPLE_VERDICT_COLUMN,
};
use crate::normalize::{ensure_and_clean, normalize_headers};
use crate::summary::compute_summary;

/// Normalize and clean an uploaded input table for reconciliation.
pub fn prepare_input(table: &mut Table) {
    normalize_headers(table);
    ensure_and_clean(table, &[FIELD_CITY, FIELD_STATE, FIELD_PINCODE]);
}

/// Reconcile `input` against `master` under the selected mode.
///
/// Left-join semantics: the output table is the input table plus one verdict
/// column, with the same rows in the same order, nothing dropped or
/// duplicated. The master table is only read.
pub fn run(mode: Mode, input: &Table, master: &Table) -> Result<CheckResult, FeasError> {
    if master.is_empty() {
        return Err(match mode {
            Mode::Simple => FeasError::NoMasterData,
            Mode::Advanced => FeasError::EmptyMasterData,
        });
    }

    let verdicts = match mode {
        Mode::Simple => run_simple(input, master),
        Mode::Advanced => run_advanced(input, master),
    };

    let mut table = input.clone();
    let column = match mode {
        Mode::Simple => SIMPLE_VERDICT_COLUMN,
        Mode::Advanced => ADVANCED_VERDICT_COLUMN,
    };
    let col = table.add_column(column, "");
    for (row, verdict) in verdicts.iter().enumerate() {
        table.rows[row][col] = verdict.to_string();
    }

    Ok(CheckResult {
        meta: CheckMeta {
            mode: mode.as_str().to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: compute_summary(&verdicts),
        table,
    })
}

/// Simple mode: pure (city, pincode) existence check against the
/// de-duplicated master key set. Status values are never consulted.
fn run_simple(input: &Table, master: &Table) -> Vec<Verdict> {
    let master_keys = dedup_geo(master);
    let input_cols = KeyColumns::locate(input);

    (0..input.row_count())
        .map(|row| {
            if master_keys.contains_key(&input_cols.geo_key(input, row)) {
                Verdict::Feasible
            } else {
                Verdict::NotFeasible
            }
        })
        .collect()
}

/// Advanced mode: status lookup with tiered fallback.
///
/// Tier 1 matches on (city, state, pincode), tier 2 on (city, pincode).
/// A tier-1 result wins whenever it carries a usable status; a key match
/// with empty/unrecognized status is "no usable status" for that tier and
/// fallback still applies. Neither tier usable → No Match Found.
fn run_advanced(input: &Table, master: &Table) -> Vec<Verdict> {
    let m1 = dedup_geo_state(master);
    let m2 = dedup_geo(master);
    let input_cols = KeyColumns::locate(input);
    let status_col = master.column_index(FIELD_STATUS);

    let class_at = |row: usize| -> StatusClass {
        match status_col {
            Some(col) => classify_status(master.cell(row, col)),
            None => StatusClass::Unknown,
        }
    };

    (0..input.row_count())
        .map(|row| {
            let tier1 = m1
                .get(&input_cols.geo_state_key(input, row))
                .map(|&m_row| class_at(m_row))
                .unwrap_or(StatusClass::Unknown);
            if let Some(verdict) = tier1.verdict() {
                return verdict;
            }

            let tier2 = m2
                .get(&input_cols.geo_key(input, row))
                .map(|&m_row| class_at(m_row))
                .unwrap_or(StatusClass::Unknown);
            tier2.verdict().unwrap_or(Verdict::NoMatchFound)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cols: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(cols.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|c| c.to_string()).collect());
        }
        t
    }

    #[test]
    fn empty_master_is_terminal_per_mode() {
        let input = table(&["city", "pincode"], &[&["PUNE", "411001"]]);
        let master = table(&["city", "pincode"], &[]);
        assert!(matches!(
            run(Mode::Simple, &input, &master),
            Err(FeasError::NoMasterData)
        ));
        assert!(matches!(
            run(Mode::Advanced, &input, &master),
            Err(FeasError::EmptyMasterData)
        ));
    }

    #[test]
    fn simple_mode_membership() {
        let master = table(
            &["city", "pincode"],
            &[&["PUNE", "411001"], &["MUMBAI", "400001"]],
        );
        let input = table(
            &["city", "pincode"],
            &[&["PUNE", "411001"], &["DELHI", "110001"]],
        );
        let result = run(Mode::Simple, &input, &master).unwrap();
        let col = result.table.column_index("Status").unwrap();
        assert_eq!(result.table.cell(0, col), "Feasible");
        assert_eq!(result.table.cell(1, col), "Not Feasible");
        assert_eq!(result.summary.feasible, 1);
        assert_eq!(result.summary.not_feasible, 1);
    }

    #[test]
    fn advanced_mode_no_status_column_yields_no_match() {
        let master = table(&["city", "state", "pincode"], &[&["PUNE", "MH", "411001"]]);
        let input = table(&["city", "state", "pincode"], &[&["PUNE", "MH", "411001"]]);
        let result = run(Mode::Advanced, &input, &master).unwrap();
        let col = result.table.column_index("FinalStatus").unwrap();
        assert_eq!(result.table.cell(0, col), "No Match Found");
    }

    #[test]
    fn master_is_not_mutated() {
        let master = table(
            &["city", "state", "pincode", "status"],
            &[&["PUNE", "MH", "411001", "Feasible"]],
        );
        let snapshot = master.clone();
        let input = table(&["city", "state", "pincode"], &[&["PUNE", "MH", "411001"]]);
        run(Mode::Advanced, &input, &master).unwrap();
        assert_eq!(master.columns, snapshot.columns);
        assert_eq!(master.rows, snapshot.rows);
    }

    #[test]
    fn prepare_input_pipeline() {
        let mut input = table(&["City.Name", "PIN-code"], &[&[" pune ", "411-001"]]);
        // "City.Name" normalizes to "city name", not "city"; cleaning then
        // inserts the canonical columns empty.
        prepare_input(&mut input);
        assert!(input.column_index("city").is_some());
        assert!(input.column_index("pincode").is_some());
    }
}
