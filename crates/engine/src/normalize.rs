use crate::model::{Table, FIELD_CITY, FIELD_PINCODE, FIELD_STATE};

/// Canonicalize one header: trim, lower-case, collapse runs of `.` `-` `_`
/// and whitespace into single spaces. Idempotent: a normalized header
/// passes through unchanged.
pub fn normalize_header(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for ch in lowered.chars() {
        if ch == '.' || ch == '-' || ch == '_' || ch.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
    }

    out
}

/// Canonicalize every column name in place.
pub fn normalize_headers(table: &mut Table) {
    for col in &mut table.columns {
        *col = normalize_header(col);
    }
}

/// Guarantee every required field exists (inserting an empty column if
/// absent), then apply field-specific value normalization:
/// city/state → trim + uppercase, pincode → digits only.
///
/// Total over any table; never fails. Only the listed fields are touched.
pub fn ensure_and_clean(table: &mut Table, required: &[&str]) {
    for &field in required {
        if table.column_index(field).is_none() {
            table.add_column(field, "");
        }
    }

    for &field in required {
        let Some(idx) = table.column_index(field) else {
            continue;
        };
        match field {
            FIELD_CITY | FIELD_STATE => {
                for row in &mut table.rows {
                    row[idx] = row[idx].trim().to_uppercase();
                }
            }
            FIELD_PINCODE => {
                for row in &mut table.rows {
                    row[idx].retain(|c| c.is_ascii_digit());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_basic() {
        assert_eq!(normalize_header("  City  "), "city");
        assert_eq!(normalize_header("Pin-Code"), "pin code");
        assert_eq!(normalize_header("done_by"), "done by");
        assert_eq!(normalize_header("a..b__c--d"), "a b c d");
        assert_eq!(normalize_header("a  .  b"), "a b");
    }

    #[test]
    fn header_strips_leading_and_trailing_separators() {
        assert_eq!(normalize_header(".city."), "city");
        assert_eq!(normalize_header("__state__"), "state");
    }

    #[test]
    fn header_idempotent() {
        let inputs = ["City.Name", "  PIN-code ", "done_by", "plain"];
        for input in inputs {
            let once = normalize_header(input);
            assert_eq!(normalize_header(&once), once);
        }
    }

    fn table(cols: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(cols.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|c| c.to_string()).collect());
        }
        t
    }

    #[test]
    fn clean_inserts_missing_required_columns() {
        let mut t = table(&["city"], &[&["pune"]]);
        ensure_and_clean(&mut t, &["city", "state", "pincode"]);
        assert_eq!(t.columns, vec!["city", "state", "pincode"]);
        assert_eq!(t.rows[0], vec!["PUNE", "", ""]);
    }

    #[test]
    fn clean_uppercases_city_and_state() {
        let mut t = table(&["city", "state"], &[&[" pune ", "maharashtra"]]);
        ensure_and_clean(&mut t, &["city", "state"]);
        assert_eq!(t.rows[0], vec!["PUNE", "MAHARASHTRA"]);
    }

    #[test]
    fn clean_strips_non_digits_from_pincode() {
        let mut t = table(
            &["pincode"],
            &[&["560-001"], &["N/A"], &["411 001"], &[""]],
        );
        ensure_and_clean(&mut t, &["pincode"]);
        assert_eq!(t.rows[0], vec!["560001"]);
        assert_eq!(t.rows[1], vec![""]);
        assert_eq!(t.rows[2], vec!["411001"]);
        assert_eq!(t.rows[3], vec![""]);
    }

    #[test]
    fn clean_leaves_other_fields_alone() {
        let mut t = table(&["city", "remark"], &[&["pune", " keep Me "]]);
        ensure_and_clean(&mut t, &["city"]);
        assert_eq!(t.cell(0, 1), " keep Me ");
    }
}
