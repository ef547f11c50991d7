//! Source adapters: header-addressed tables in, typed records out.
//!
//! The loader never touches the filesystem. Callers hand it CSV text (or a
//! [`Table`] built from a spreadsheet) and the configured column candidates.

use crate::config::{LocksSource, RentRollSource, UnitsSource};
use crate::error::ReconError;
use crate::model::{LockRecord, LockStatus, RentRollRecord, UnitRecord};

/// A header row plus data rows, all cells as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse CSV text whose first record is the header row.
    pub fn from_csv(source: &str, csv_data: &str) -> Result<Self, ReconError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ReconError::Io { source: source.into(), message: e.to_string() })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| ReconError::Io { source: source.into(), message: e.to_string() })?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        Ok(Self::new(headers, rows))
    }

    /// Build a table, dropping rows with no content at all.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect();
        Self { headers, rows }
    }

    /// Index of the first candidate present among the headers. Header text is
    /// compared after trimming whitespace and surrounding double quotes.
    pub fn column(&self, source: &str, candidates: &[String]) -> Result<usize, ReconError> {
        candidates
            .iter()
            .find_map(|want| {
                self.headers
                    .iter()
                    .position(|h| normalize_header(h) == normalize_header(want))
            })
            .ok_or_else(|| ReconError::MissingColumn {
                source: source.into(),
                candidates: candidates.to_vec(),
            })
    }

    fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map(|s| s.trim()).unwrap_or("")
    }
}

fn normalize_header(h: &str) -> &str {
    h.trim().trim_matches('"').trim()
}

// ---------------------------------------------------------------------------
// Per-source loaders
// ---------------------------------------------------------------------------

pub fn load_units(table: &Table, source: &UnitsSource) -> Result<Vec<UnitRecord>, ReconError> {
    let unit_idx = table.column("units", &source.columns.unit)?;
    let status_idx = table.column("units", &source.columns.status)?;

    let units: Vec<UnitRecord> = table
        .rows
        .iter()
        .map(|row| UnitRecord {
            unit: Table::cell(row, unit_idx).to_string(),
            status: Table::cell(row, status_idx).to_string(),
        })
        .collect();

    log::info!("loaded {} units", units.len());
    Ok(units)
}

pub fn load_rentroll(
    table: &Table,
    source: &RentRollSource,
) -> Result<Vec<RentRollRecord>, ReconError> {
    let unit_idx = table.column("rentroll", &source.columns.unit)?;
    let dpd_idx = table.column("rentroll", &source.columns.days_past_due)?;

    let records: Vec<RentRollRecord> = table
        .rows
        .iter()
        .map(|row| {
            let unit = Table::cell(row, unit_idx).to_string();
            let days_past_due = parse_days_past_due(Table::cell(row, dpd_idx), &unit);
            RentRollRecord { unit, days_past_due }
        })
        .collect();

    log::info!("loaded {} rent roll records", records.len());
    Ok(records)
}

pub fn load_locks(table: &Table, source: &LocksSource) -> Result<Vec<LockRecord>, ReconError> {
    let unit_idx = table.column("locks", &source.columns.unit)?;
    let status_idx = table.column("locks", &source.columns.status)?;

    let records: Vec<LockRecord> = table
        .rows
        .iter()
        .map(|row| LockRecord {
            unit: Table::cell(row, unit_idx).to_string(),
            status: LockStatus::parse(Table::cell(row, status_idx)),
        })
        .collect();

    log::info!("loaded {} lock assignments", records.len());
    Ok(records)
}

/// Empty means absent. Decimals round up so any positive fraction still
/// counts as past due. Non-numeric text is treated as absent.
pub fn parse_days_past_due(raw: &str, unit: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    match s.replace(',', "").parse::<f64>() {
        Ok(f) if f.is_finite() => Some(f.ceil() as i64),
        _ => {
            log::warn!("unit {unit}: non-numeric days past due '{s}', treating as 0");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LocksColumns, RentRollColumns, UnitsColumns};

    fn units_source() -> UnitsSource {
        UnitsSource { file: "units.csv".into(), columns: UnitsColumns::default() }
    }

    fn rentroll_source() -> RentRollSource {
        RentRollSource { file: "rentroll.csv".into(), columns: RentRollColumns::default() }
    }

    fn locks_source() -> LocksSource {
        LocksSource { file: "locks.csv".into(), columns: LocksColumns::default() }
    }

    #[test]
    fn units_trimmed_and_blank_rows_dropped() {
        let csv = "Unit,Status,Size\n A001 , Occupied ,10x10\n,,\nA002,Vacant,5x5\n";
        let table = Table::from_csv("units", csv).unwrap();
        let units = load_units(&table, &units_source()).unwrap();
        assert_eq!(
            units,
            vec![
                UnitRecord { unit: "A001".into(), status: "Occupied".into() },
                UnitRecord { unit: "A002".into(), status: "Vacant".into() },
            ]
        );
    }

    #[test]
    fn rentroll_accepts_uppercase_and_quoted_headers() {
        let csv = "\"UNIT\",\"DAYS PAST DUE\"\nA001,15\nA002,\nA003,0.5\nA004,n/a\n";
        let table = Table::from_csv("rentroll", csv).unwrap();
        let rr = load_rentroll(&table, &rentroll_source()).unwrap();
        let dpd: Vec<Option<i64>> = rr.iter().map(|r| r.days_past_due).collect();
        assert_eq!(dpd, vec![Some(15), None, Some(1), None]);
    }

    #[test]
    fn locks_parse_spaced_vocabulary() {
        let csv = "Unit Number,Status\nA001,Tenant Using Lock\nA002,Assigned Vacant\nA003,Bolt Cutter\n";
        let table = Table::from_csv("locks", csv).unwrap();
        let locks = load_locks(&table, &locks_source()).unwrap();
        assert_eq!(locks[0].status, LockStatus::TenantUsingLock);
        assert_eq!(locks[1].status, LockStatus::AssignedVacant);
        assert_eq!(locks[2].status, LockStatus::Unknown("Bolt Cutter".into()));
    }

    #[test]
    fn missing_column_is_a_loader_error() {
        let table = Table::from_csv("locks", "Unit,Status\nA001,Assigned Vacant\n").unwrap();
        let err = load_locks(&table, &locks_source()).unwrap_err();
        assert_eq!(err.stage(), crate::error::Stage::Loader);
        assert!(err.to_string().contains("Unit Number"));
    }

    #[test]
    fn first_present_candidate_wins() {
        let table = Table::new(
            vec!["DAYS PAST DUE".into(), "Days Past Due".into(), "Unit".into()],
            vec![vec!["1".into(), "2".into(), "A".into()]],
        );
        let idx = table.column("rentroll", &RentRollColumns::default().days_past_due).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn days_past_due_parsing() {
        assert_eq!(parse_days_past_due("", "u"), None);
        assert_eq!(parse_days_past_due(" 7 ", "u"), Some(7));
        assert_eq!(parse_days_past_due("-2", "u"), Some(-2));
        assert_eq!(parse_days_past_due("1,200", "u"), Some(1200));
        assert_eq!(parse_days_past_due("0.0", "u"), Some(0));
        assert_eq!(parse_days_past_due("abc", "u"), None);
    }
}
