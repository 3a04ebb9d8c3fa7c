use crate::model::StatusClass;

/// Classify one raw status value.
///
/// Matching is case-insensitive and whitespace-trimmed. Exact-set checks run
/// before the substring check; first match wins. Anything unrecognized
/// (including empty) is `Unknown`, which the engine treats as "no usable
/// status" rather than an error.
pub fn classify_status(raw: &str) -> StatusClass {
    let value = raw.trim().to_lowercase();
    match value.as_str() {
        "feasible" | "f" | "yes" => StatusClass::Feasible,
        "not feasible" | "nf" | "no" => StatusClass::NotFeasible,
        _ if value.contains("wip") => StatusClass::Wip,
        _ => StatusClass::Unknown,
    }
}

/// Classify a sequence of raw status values into a parallel sequence.
pub fn classify_all<S: AsRef<str>>(values: &[S]) -> Vec<StatusClass> {
    values.iter().map(|v| classify_status(v.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feasible_set() {
        assert_eq!(classify_status("feasible"), StatusClass::Feasible);
        assert_eq!(classify_status("F"), StatusClass::Feasible);
        assert_eq!(classify_status(" Yes "), StatusClass::Feasible);
    }

    #[test]
    fn not_feasible_set() {
        assert_eq!(classify_status("Not Feasible"), StatusClass::NotFeasible);
        assert_eq!(classify_status("NF"), StatusClass::NotFeasible);
        assert_eq!(classify_status("no"), StatusClass::NotFeasible);
    }

    #[test]
    fn wip_substring() {
        assert_eq!(classify_status("WIP-pending"), StatusClass::Wip);
        assert_eq!(classify_status("survey wip"), StatusClass::Wip);
        assert_eq!(classify_status("WIP"), StatusClass::Wip);
    }

    #[test]
    fn unknown_values() {
        assert_eq!(classify_status(""), StatusClass::Unknown);
        assert_eq!(classify_status("unknown"), StatusClass::Unknown);
        assert_eq!(classify_status("maybe"), StatusClass::Unknown);
    }

    #[test]
    fn exact_sets_win_over_substring() {
        // "f" belongs to the feasible set even though a looser reading could
        // send it elsewhere; the exact check runs first.
        assert_eq!(classify_status("f"), StatusClass::Feasible);
    }

    #[test]
    fn classify_all_is_parallel() {
        let raw = ["F", "nf", "WIP-pending", ""];
        let classes = classify_all(&raw);
        assert_eq!(
            classes,
            vec![
                StatusClass::Feasible,
                StatusClass::NotFeasible,
                StatusClass::Wip,
                StatusClass::Unknown,
            ]
        );
    }
}
