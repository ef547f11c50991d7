use std::collections::{HashMap, HashSet};

use crate::model::{DataQualityNote, LockRecord, RentRollRecord};

/// Index rent roll records by unit. Last entry wins on duplicates; rows
/// with a blank unit are skipped and noted.
pub fn index_rentroll<'a>(
    records: &'a [RentRollRecord],
    notes: &mut Vec<DataQualityNote>,
) -> HashMap<&'a str, &'a RentRollRecord> {
    let mut by_unit: HashMap<&str, &RentRollRecord> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if record.unit.is_empty() {
            notes.push(DataQualityNote::BlankUnitId { source: "rentroll".into(), index });
            continue;
        }
        if by_unit.insert(record.unit.as_str(), record).is_some() {
            notes.push(DataQualityNote::DuplicateRentRoll { unit: record.unit.clone() });
        }
    }
    by_unit
}

/// Index lock records by unit. Last entry wins on duplicates. Unassigned
/// locks (blank unit) are skipped and noted.
pub fn index_locks<'a>(
    records: &'a [LockRecord],
    notes: &mut Vec<DataQualityNote>,
) -> HashMap<&'a str, &'a LockRecord> {
    let mut by_unit: HashMap<&str, &LockRecord> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if record.unit.is_empty() {
            notes.push(DataQualityNote::BlankUnitId { source: "locks".into(), index });
            continue;
        }
        if let Some(previous) = by_unit.insert(record.unit.as_str(), record) {
            notes.push(DataQualityNote::DuplicateLock {
                unit: record.unit.clone(),
                kept: record.status.to_string(),
                discarded: previous.status.to_string(),
            });
        }
    }
    by_unit
}

/// Units referenced by a secondary source but absent from the unit master,
/// in first-seen order, each reported once. Blank ids are never orphans.
pub fn orphan_units<'a, I>(master: &HashSet<&str>, referenced: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for unit in referenced {
        if !unit.is_empty() && !master.contains(unit) && seen.insert(unit) {
            out.push(unit.to_string());
        }
    }
    out
}
