use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A row from the unit master. The unit master is the authoritative unit set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    pub unit: String,
    pub status: String,
}

/// A row from the rent roll. `days_past_due: None` is treated as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentRollRecord {
    pub unit: String,
    pub days_past_due: Option<i64>,
}

/// A row from the lock assignment report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRecord {
    pub unit: String,
    pub status: LockStatus,
}

/// Pre-loaded records for one audit run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub units: Vec<UnitRecord>,
    pub rentroll: Vec<RentRollRecord>,
    pub locks: Vec<LockRecord>,
}

// ---------------------------------------------------------------------------
// Lock vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LockStatus {
    AssignedVacant,
    TenantUsingLock,
    AssignedOverlock,
    AssignedAuction,
    /// Anything outside the vocabulary, kept verbatim for display.
    Unknown(String),
}

impl LockStatus {
    /// Parse a lock report status. Whitespace, `-` and `_` are ignored and the
    /// comparison is case-insensitive, so "Assigned Vacant" is `AssignedVacant`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let squashed: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match squashed.as_str() {
            "assignedvacant" => Self::AssignedVacant,
            "tenantusinglock" => Self::TenantUsingLock,
            "assignedoverlock" => Self::AssignedOverlock,
            "assignedauction" => Self::AssignedAuction,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::AssignedVacant => "AssignedVacant",
            Self::TenantUsingLock => "TenantUsingLock",
            Self::AssignedOverlock => "AssignedOverlock",
            Self::AssignedAuction => "AssignedAuction",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn category(&self) -> LockCategory {
        match self {
            Self::AssignedVacant => LockCategory::AssignedVacant,
            Self::TenantUsingLock => LockCategory::TenantUsingLock,
            Self::AssignedOverlock => LockCategory::AssignedOverlock,
            Self::AssignedAuction => LockCategory::AssignedAuction,
            Self::Unknown(_) => LockCategory::Unknown,
        }
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LockStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// What the lock report says about a unit, after the join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedLock {
    Recorded(LockStatus),
    Missing,
}

impl ObservedLock {
    pub fn category(&self) -> LockCategory {
        match self {
            Self::Recorded(status) => status.category(),
            Self::Missing => LockCategory::Missing,
        }
    }

    pub fn status(&self) -> Option<&LockStatus> {
        match self {
            Self::Recorded(status) => Some(status),
            Self::Missing => None,
        }
    }
}

impl fmt::Display for ObservedLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recorded(status) => f.write_str(status.as_str()),
            Self::Missing => f.write_str("(no lock record)"),
        }
    }
}

/// A recorded status serializes as its text; no record serializes as `null`
/// so a raw status literally reading "Missing" stays distinguishable.
impl Serialize for ObservedLock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Recorded(status) => status.serialize(serializer),
            Self::Missing => serializer.serialize_none(),
        }
    }
}

/// Lock status bucket used for comparison and breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LockCategory {
    AssignedVacant,
    TenantUsingLock,
    AssignedOverlock,
    AssignedAuction,
    Unknown,
    Missing,
}

impl LockCategory {
    pub const ALL: [LockCategory; 6] = [
        Self::AssignedVacant,
        Self::TenantUsingLock,
        Self::AssignedOverlock,
        Self::AssignedAuction,
        Self::Unknown,
        Self::Missing,
    ];
}

impl fmt::Display for LockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssignedVacant => write!(f, "AssignedVacant"),
            Self::TenantUsingLock => write!(f, "TenantUsingLock"),
            Self::AssignedOverlock => write!(f, "AssignedOverlock"),
            Self::AssignedAuction => write!(f, "AssignedAuction"),
            Self::Unknown => write!(f, "Unknown"),
            Self::Missing => write!(f, "Missing"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OccupancyState {
    Vacant,
    OccupiedCurrent,
    OccupiedDelinquent,
    Unrecognized,
}

impl OccupancyState {
    pub const ALL: [OccupancyState; 4] = [
        Self::Vacant,
        Self::OccupiedCurrent,
        Self::OccupiedDelinquent,
        Self::Unrecognized,
    ];
}

impl fmt::Display for OccupancyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vacant => write!(f, "Vacant"),
            Self::OccupiedCurrent => write!(f, "OccupiedCurrent"),
            Self::OccupiedDelinquent => write!(f, "OccupiedDelinquent"),
            Self::Unrecognized => write!(f, "Unrecognized"),
        }
    }
}

/// Operational priority of a miscompare. Downstream reports key formatting
/// on these exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    None,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::None, Self::Medium, Self::High];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Why a row is a miscompare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MiscompareReason {
    VacantWithTenantLock,
    CurrentWithoutTenantLock,
    DelinquentWithoutLock,
    UnrecognizedStatus,
    MissingLock,
    UnknownLockStatus,
    LockMismatch,
}

impl MiscompareReason {
    pub fn recommended_action(&self) -> &'static str {
        match self {
            Self::VacantWithTenantLock => "Remove tenant lock and verify unit is truly vacant",
            Self::CurrentWithoutTenantLock => "Install proper tenant lock immediately",
            Self::DelinquentWithoutLock => "Install overlock or proceed to auction",
            Self::UnrecognizedStatus => "Correct the unit status in the unit master",
            Self::MissingLock => "Record the unit's lock assignment",
            Self::UnknownLockStatus => "Correct the lock status in the lock report",
            Self::LockMismatch => "Review lock assignment and correct as needed",
        }
    }
}

impl fmt::Display for MiscompareReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VacantWithTenantLock => "vacant_with_tenant_lock",
            Self::CurrentWithoutTenantLock => "current_without_tenant_lock",
            Self::DelinquentWithoutLock => "delinquent_without_lock",
            Self::UnrecognizedStatus => "unrecognized_status",
            Self::MissingLock => "missing_lock",
            Self::UnknownLockStatus => "unknown_lock_status",
            Self::LockMismatch => "lock_mismatch",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub unit: String,
    pub unit_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_past_due: Option<i64>,
    pub state: OccupancyState,
    pub expected: Vec<LockStatus>,
    pub observed: ObservedLock,
    pub lock_category: LockCategory,
    pub miscompare: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<MiscompareReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<&'static str>,
}

/// A non-fatal anomaly found while joining the three sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityNote {
    OccupiedNotInRentRoll { unit: String },
    UnrecognizedStatus { unit: String, status: String },
    DuplicateRentRoll { unit: String },
    DuplicateLock { unit: String, kept: String, discarded: String },
    /// A rent roll or lock row with no unit; `index` is its 0-based record position.
    BlankUnitId { source: String, index: usize },
    UnknownLockStatus { unit: String, status: String },
    OrphanRentRoll { unit: String },
    OrphanLock { unit: String },
}

impl fmt::Display for DataQualityNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OccupiedNotInRentRoll { unit } => {
                write!(f, "unit {unit} marked occupied but not in rent roll; treating as vacant")
            }
            Self::UnrecognizedStatus { unit, status } => {
                write!(f, "unit {unit} has unrecognized status '{status}'")
            }
            Self::DuplicateRentRoll { unit } => {
                write!(f, "unit {unit} appears more than once in rent roll; last entry kept")
            }
            Self::DuplicateLock { unit, kept, discarded } => write!(
                f,
                "unit {unit} has more than one lock record; kept '{kept}', discarded '{discarded}'"
            ),
            Self::BlankUnitId { source, index } => {
                write!(f, "{source} record #{index} has a blank unit identifier; skipped")
            }
            Self::UnknownLockStatus { unit, status } => {
                write!(f, "unit {unit} has unknown lock status '{status}'")
            }
            Self::OrphanRentRoll { unit } => {
                write!(f, "rent roll lists unit {unit} which is not in the unit master")
            }
            Self::OrphanLock { unit } => {
                write!(f, "lock report lists unit {unit} which is not in the unit master")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total_units: usize,
    pub miscompares: usize,
    pub high_severity: usize,
    pub medium_severity: usize,
    /// Percentage of units with a miscompare, 0 when there are no units.
    pub miscompare_rate: f64,
    pub by_state: BTreeMap<OccupancyState, usize>,
    pub by_lock: BTreeMap<LockCategory, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub crosstab: BTreeMap<OccupancyState, BTreeMap<LockCategory, usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub summary: AnalysisSummary,
    pub rows: Vec<AnalysisRow>,
    pub notes: Vec<DataQualityNote>,
}

impl AnalysisResult {
    pub fn row(&self, unit: &str) -> Option<&AnalysisRow> {
        self.rows.iter().find(|r| r.unit == unit)
    }

    /// Miscompare rows, highest severity first, then by reason, then input order.
    pub fn miscompares(&self) -> Vec<&AnalysisRow> {
        let mut out: Vec<&AnalysisRow> = self.rows.iter().filter(|r| r.miscompare).collect();
        // sort_by is stable, so ties keep input order
        out.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.reason.cmp(&b.reason)));
        out
    }

    pub fn high_severity(&self) -> Vec<&AnalysisRow> {
        self.rows.iter().filter(|r| r.severity == Severity::High).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_status_parse_vocabulary() {
        assert_eq!(LockStatus::parse("AssignedVacant"), LockStatus::AssignedVacant);
        assert_eq!(LockStatus::parse("Assigned Vacant"), LockStatus::AssignedVacant);
        assert_eq!(LockStatus::parse("  tenant using lock "), LockStatus::TenantUsingLock);
        assert_eq!(LockStatus::parse("Assigned-Overlock"), LockStatus::AssignedOverlock);
        assert_eq!(LockStatus::parse("ASSIGNED_AUCTION"), LockStatus::AssignedAuction);
    }

    #[test]
    fn lock_status_unknown_kept_verbatim() {
        let s = LockStatus::parse("  Broken Hasp ");
        assert_eq!(s, LockStatus::Unknown("Broken Hasp".into()));
        assert_eq!(s.to_string(), "Broken Hasp");
        assert_eq!(s.category(), LockCategory::Unknown);
    }

    #[test]
    fn raw_missing_status_distinct_from_no_record() {
        let raw = ObservedLock::Recorded(LockStatus::parse("Missing"));
        let none = ObservedLock::Missing;
        assert_eq!(raw.category(), LockCategory::Unknown);
        assert_eq!(none.category(), LockCategory::Missing);
        assert_ne!(raw.to_string(), none.to_string());
        assert_eq!(none.to_string(), "(no lock record)");
        assert_eq!(serde_json::to_value(&raw).unwrap(), "Missing");
        assert!(serde_json::to_value(&none).unwrap().is_null());
    }

    #[test]
    fn vocabulary_strings() {
        assert_eq!(serde_json::to_string(&Severity::None).unwrap(), "\"None\"");
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"Medium\"");
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"High\"");
        assert_eq!(
            serde_json::to_string(&OccupancyState::OccupiedDelinquent).unwrap(),
            "\"OccupiedDelinquent\""
        );
        assert_eq!(serde_json::to_string(&ObservedLock::Missing).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&ObservedLock::Recorded(LockStatus::AssignedAuction)).unwrap(),
            "\"AssignedAuction\""
        );
    }

    #[test]
    fn note_serializes_with_kind_tag() {
        let note = DataQualityNote::OrphanLock { unit: "Z9".into() };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["kind"], "orphan_lock");
        assert_eq!(json["unit"], "Z9");
    }
}
