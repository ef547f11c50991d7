use crate::model::{
    LockCategory, LockStatus, MiscompareReason, ObservedLock, OccupancyState, RentRollRecord,
    Severity, UnitRecord,
};

/// First three characters of the trimmed status, lowercased.
pub fn status_prefix(status: &str) -> String {
    status.trim().chars().take(3).collect::<String>().to_lowercase()
}

/// Classify a unit from its master status and its rent roll entry, if any.
///
/// - `vac…` is always `Vacant`.
/// - A unit with no rent roll entry is `Vacant`, unless its status is not
///   recognized at all.
/// - `occ…` with days past due > 0 is `OccupiedDelinquent`, otherwise
///   `OccupiedCurrent`.
/// - Any other prefix is `Unrecognized`.
pub fn classify_unit(unit: &UnitRecord, rent: Option<&RentRollRecord>) -> OccupancyState {
    match status_prefix(&unit.status).as_str() {
        "vac" => OccupancyState::Vacant,
        "occ" => match rent {
            None => OccupancyState::Vacant,
            Some(r) if r.days_past_due.unwrap_or(0) > 0 => OccupancyState::OccupiedDelinquent,
            Some(_) => OccupancyState::OccupiedCurrent,
        },
        _ => OccupancyState::Unrecognized,
    }
}

/// Lock statuses acceptable for an occupancy state. Empty for `Unrecognized`:
/// no observed status can be correct for an unclassified unit.
pub fn expected_lock_statuses(state: OccupancyState) -> Vec<LockStatus> {
    match state {
        OccupancyState::Vacant => vec![LockStatus::AssignedVacant],
        OccupancyState::OccupiedCurrent => vec![LockStatus::TenantUsingLock],
        OccupancyState::OccupiedDelinquent => {
            vec![LockStatus::AssignedOverlock, LockStatus::AssignedAuction]
        }
        OccupancyState::Unrecognized => Vec::new(),
    }
}

/// `true` unless the observed status is a member of the expected set.
/// `Missing` and `Unknown` never match.
pub fn is_miscompare(expected: &[LockStatus], observed: &ObservedLock) -> bool {
    match observed {
        ObservedLock::Recorded(LockStatus::Unknown(_)) | ObservedLock::Missing => true,
        ObservedLock::Recorded(status) => !expected.contains(status),
    }
}

/// Delinquent units with the wrong lock and unclassifiable units outrank
/// every other mismatch.
pub fn severity(state: OccupancyState, miscompare: bool) -> Severity {
    match (state, miscompare) {
        (OccupancyState::Unrecognized, _) => Severity::High,
        (_, false) => Severity::None,
        (OccupancyState::OccupiedDelinquent, true) => Severity::High,
        (OccupancyState::Vacant | OccupancyState::OccupiedCurrent, true) => Severity::Medium,
    }
}

/// Describe a miscompare. `None` for compliant rows.
pub fn miscompare_reason(
    state: OccupancyState,
    observed: &ObservedLock,
    miscompare: bool,
) -> Option<MiscompareReason> {
    if state == OccupancyState::Unrecognized {
        return Some(MiscompareReason::UnrecognizedStatus);
    }
    if !miscompare {
        return None;
    }

    let reason = match (state, observed.category()) {
        (_, LockCategory::Missing) => MiscompareReason::MissingLock,
        (_, LockCategory::Unknown) => MiscompareReason::UnknownLockStatus,
        (
            OccupancyState::Vacant,
            LockCategory::TenantUsingLock | LockCategory::AssignedOverlock,
        ) => MiscompareReason::VacantWithTenantLock,
        (
            OccupancyState::OccupiedCurrent,
            LockCategory::AssignedVacant | LockCategory::AssignedOverlock,
        ) => MiscompareReason::CurrentWithoutTenantLock,
        (OccupancyState::OccupiedDelinquent, LockCategory::AssignedVacant) => {
            MiscompareReason::DelinquentWithoutLock
        }
        _ => MiscompareReason::LockMismatch,
    };
    Some(reason)
}
