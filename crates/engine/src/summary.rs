use std::collections::HashMap;

use crate::model::{CheckSummary, Verdict};

/// Compute per-verdict counts over the annotated rows.
pub fn compute_summary(verdicts: &[Verdict]) -> CheckSummary {
    let mut verdict_counts: HashMap<String, usize> = HashMap::new();
    let mut feasible = 0;
    let mut not_feasible = 0;
    let mut wip = 0;
    let mut no_match = 0;

    for v in verdicts {
        *verdict_counts.entry(v.to_string()).or_insert(0) += 1;
        match v {
            Verdict::Feasible => feasible += 1,
            Verdict::NotFeasible => not_feasible += 1,
            Verdict::Wip => wip += 1,
            Verdict::NoMatchFound => no_match += 1,
        }
    }

    CheckSummary {
        total_rows: verdicts.len(),
        feasible,
        not_feasible,
        wip,
        no_match,
        verdict_counts,
    }
}
