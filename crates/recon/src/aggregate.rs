use std::collections::BTreeMap;

use crate::model::{AnalysisRow, LockCategory, OccupancyState};

/// Occupancy state x observed lock category counts. Every state and every
/// category is present, zero-filled.
pub fn crosstab(rows: &[AnalysisRow]) -> BTreeMap<OccupancyState, BTreeMap<LockCategory, usize>> {
    let mut table: BTreeMap<OccupancyState, BTreeMap<LockCategory, usize>> = OccupancyState::ALL
        .iter()
        .map(|state| (*state, LockCategory::ALL.iter().map(|c| (*c, 0)).collect()))
        .collect();

    for row in rows {
        if let Some(cell) = table
            .get_mut(&row.state)
            .and_then(|by_lock| by_lock.get_mut(&row.lock_category))
        {
            *cell += 1;
        }
    }

    table
}
