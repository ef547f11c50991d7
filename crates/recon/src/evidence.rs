use std::collections::BTreeMap;

use crate::aggregate::crosstab;
use crate::model::{AnalysisRow, AnalysisSummary, LockCategory, OccupancyState, Severity};

/// Compute summary statistics from analysis rows.
pub fn compute_summary(rows: &[AnalysisRow]) -> AnalysisSummary {
    let mut by_state: BTreeMap<OccupancyState, usize> =
        OccupancyState::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_lock: BTreeMap<LockCategory, usize> =
        LockCategory::ALL.iter().map(|c| (*c, 0)).collect();
    let mut by_severity: BTreeMap<Severity, usize> =
        Severity::ALL.iter().map(|s| (*s, 0)).collect();
    let mut miscompares = 0;

    for row in rows {
        *by_state.entry(row.state).or_insert(0) += 1;
        *by_lock.entry(row.lock_category).or_insert(0) += 1;
        *by_severity.entry(row.severity).or_insert(0) += 1;
        if row.miscompare {
            miscompares += 1;
        }
    }

    let total_units = rows.len();
    let miscompare_rate = if total_units == 0 {
        0.0
    } else {
        miscompares as f64 / total_units as f64 * 100.0
    };

    AnalysisSummary {
        total_units,
        miscompares,
        high_severity: by_severity[&Severity::High],
        medium_severity: by_severity[&Severity::Medium],
        miscompare_rate,
        by_state,
        by_lock,
        by_severity,
        crosstab: crosstab(rows),
    }
}
