use std::collections::HashSet;

use crate::classify::{
    classify_unit, expected_lock_statuses, is_miscompare, miscompare_reason, severity,
    status_prefix,
};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::matcher::{index_locks, index_rentroll, orphan_units};
use crate::model::{
    AnalysisResult, AnalysisRow, DataQualityNote, LockStatus, ObservedLock, OccupancyState,
    ReconInput,
};

/// Run one audit over pre-loaded records.
///
/// Pure: no I/O, no retained state. Identical input yields an identical
/// result. Fails only on structural problems in the unit master (empty or
/// duplicated unit identifiers); everything else becomes a note.
pub fn run(input: &ReconInput) -> Result<AnalysisResult, ReconError> {
    validate_shape(input)?;

    log::info!(
        "reconciling {} units against {} rent roll and {} lock records",
        input.units.len(),
        input.rentroll.len(),
        input.locks.len()
    );

    let mut notes = Vec::new();
    let rentroll = index_rentroll(&input.rentroll, &mut notes);
    let locks = index_locks(&input.locks, &mut notes);

    let mut rows = Vec::with_capacity(input.units.len());
    for unit in &input.units {
        let rent = rentroll.get(unit.unit.as_str()).copied();
        let state = classify_unit(unit, rent);

        match state {
            OccupancyState::Unrecognized => notes.push(DataQualityNote::UnrecognizedStatus {
                unit: unit.unit.clone(),
                status: unit.status.clone(),
            }),
            OccupancyState::Vacant if rent.is_none() && status_prefix(&unit.status) == "occ" => {
                notes.push(DataQualityNote::OccupiedNotInRentRoll { unit: unit.unit.clone() })
            }
            _ => {}
        }

        let observed = match locks.get(unit.unit.as_str()) {
            Some(lock) => ObservedLock::Recorded(lock.status.clone()),
            None => ObservedLock::Missing,
        };
        if let ObservedLock::Recorded(LockStatus::Unknown(raw)) = &observed {
            notes.push(DataQualityNote::UnknownLockStatus {
                unit: unit.unit.clone(),
                status: raw.clone(),
            });
        }

        let expected = expected_lock_statuses(state);
        let miscompare = is_miscompare(&expected, &observed);
        let reason = miscompare_reason(state, &observed, miscompare);

        log::debug!("unit {}: {} -> {} ({})", unit.unit, state, observed, miscompare);

        rows.push(AnalysisRow {
            unit: unit.unit.clone(),
            unit_status: unit.status.clone(),
            days_past_due: rent.and_then(|r| r.days_past_due),
            state,
            expected,
            lock_category: observed.category(),
            observed,
            miscompare,
            severity: severity(state, miscompare),
            reason,
            recommended_action: reason.map(|r| r.recommended_action()),
        });
    }

    let master: HashSet<&str> = input.units.iter().map(|u| u.unit.as_str()).collect();
    for unit in orphan_units(&master, input.rentroll.iter().map(|r| r.unit.as_str())) {
        notes.push(DataQualityNote::OrphanRentRoll { unit });
    }
    for unit in orphan_units(&master, input.locks.iter().map(|l| l.unit.as_str())) {
        notes.push(DataQualityNote::OrphanLock { unit });
    }

    for note in &notes {
        log::warn!("{note}");
    }

    let summary = compute_summary(&rows);
    log::info!(
        "detected {} miscompares out of {} units ({} high severity)",
        summary.miscompares,
        summary.total_units,
        summary.high_severity
    );

    Ok(AnalysisResult { summary, rows, notes })
}

/// Reject a unit master the join cannot be trusted on. Blank units in the
/// rent roll or lock report are handled by the matcher.
fn validate_shape(input: &ReconInput) -> Result<(), ReconError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(input.units.len());
    for (index, unit) in input.units.iter().enumerate() {
        if unit.unit.is_empty() {
            return Err(ReconError::EmptyUnitId { source: "units".into(), index });
        }
        if !seen.insert(unit.unit.as_str()) {
            return Err(ReconError::DuplicateUnit { unit: unit.unit.clone() });
        }
    }
    Ok(())
}
