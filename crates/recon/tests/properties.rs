// Property-based tests for classification and reconciliation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use proptest::prelude::*;
use lockaudit_recon::classify::classify_unit;
use lockaudit_recon::{
    run, LockRecord, LockStatus, OccupancyState, ReconInput, RentRollRecord, Severity, UnitRecord,
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Status text with a case-scrambled prefix and arbitrary tail.
fn status_with_prefix(prefix: &'static str) -> impl Strategy<Value = String> {
    (prop::collection::vec(any::<bool>(), 3), "[a-zA-Z -]{0,10}").prop_map(move |(upper, tail)| {
        let head: String = prefix
            .chars()
            .zip(upper)
            .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
            .collect();
        format!("{head}{tail}")
    })
}

fn any_status() -> impl Strategy<Value = String> {
    prop_oneof![
        status_with_prefix("vac"),
        status_with_prefix("occ"),
        "[a-zA-Z]{0,8}",
    ]
}

fn lock_status() -> impl Strategy<Value = LockStatus> {
    prop_oneof![
        Just(LockStatus::AssignedVacant),
        Just(LockStatus::TenantUsingLock),
        Just(LockStatus::AssignedOverlock),
        Just(LockStatus::AssignedAuction),
        "[A-Z][a-z]{2,8}".prop_map(|s| LockStatus::parse(&s)),
    ]
}

/// Unit ids drawn from a small pool so rent roll and lock records collide
/// with master units (and with each other) often.
fn unit_id() -> impl Strategy<Value = String> {
    (0u8..12).prop_map(|n| format!("U{n:02}"))
}

/// Drop repeated unit ids, keeping generation order (the master must be
/// unique but need not be sorted).
fn unique_in_order(units: Vec<(String, String)>) -> Vec<UnitRecord> {
    let mut seen = HashSet::new();
    units
        .into_iter()
        .filter(|(unit, _)| seen.insert(unit.clone()))
        .map(|(unit, status)| UnitRecord { unit, status })
        .collect()
}

fn input() -> impl Strategy<Value = ReconInput> {
    (
        prop::collection::vec((unit_id(), any_status()), 0..10),
        prop::collection::vec((unit_id(), prop::option::of(-5i64..60)), 0..12),
        prop::collection::vec((unit_id(), lock_status()), 0..14),
    )
        .prop_map(|(units, rentroll, locks)| ReconInput {
            units: unique_in_order(units),
            rentroll: rentroll
                .into_iter()
                .map(|(unit, days_past_due)| RentRollRecord { unit, days_past_due })
                .collect(),
            locks: locks
                .into_iter()
                .map(|(unit, status)| LockRecord { unit, status })
                .collect(),
        })
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn vac_prefix_is_always_vacant(status in status_with_prefix("vac"), dpd in prop::option::of(-5i64..60), has_rent in any::<bool>()) {
        let unit = UnitRecord { unit: "U".into(), status };
        let rent = RentRollRecord { unit: "U".into(), days_past_due: dpd };
        let state = classify_unit(&unit, if has_rent { Some(&rent) } else { None });
        prop_assert_eq!(state, OccupancyState::Vacant);
    }

    #[test]
    fn occ_without_rent_roll_is_vacant(status in status_with_prefix("occ")) {
        let unit = UnitRecord { unit: "U".into(), status };
        prop_assert_eq!(classify_unit(&unit, None), OccupancyState::Vacant);
    }

    #[test]
    fn occ_splits_on_days_past_due(status in status_with_prefix("occ"), dpd in prop::option::of(-30i64..90)) {
        let unit = UnitRecord { unit: "U".into(), status };
        let rent = RentRollRecord { unit: "U".into(), days_past_due: dpd };
        let expected = if dpd.unwrap_or(0) > 0 {
            OccupancyState::OccupiedDelinquent
        } else {
            OccupancyState::OccupiedCurrent
        };
        prop_assert_eq!(classify_unit(&unit, Some(&rent)), expected);
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn every_unit_exactly_once(input in input()) {
        let result = run(&input).unwrap();
        prop_assert_eq!(result.rows.len(), input.units.len());
        let ids: Vec<&str> = result.rows.iter().map(|r| r.unit.as_str()).collect();
        let master: Vec<&str> = input.units.iter().map(|u| u.unit.as_str()).collect();
        prop_assert_eq!(ids, master);
        let distinct: HashSet<&str> = result.rows.iter().map(|r| r.unit.as_str()).collect();
        prop_assert_eq!(distinct.len(), result.rows.len());
    }

    #[test]
    fn run_is_idempotent(input in input()) {
        let a = serde_json::to_string(&run(&input).unwrap()).unwrap();
        let b = serde_json::to_string(&run(&input).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn delinquent_miscompare_is_high(input in input()) {
        let result = run(&input).unwrap();
        for row in &result.rows {
            if row.state == OccupancyState::OccupiedDelinquent && row.miscompare {
                prop_assert_eq!(row.severity, Severity::High);
            }
            if row.state == OccupancyState::Unrecognized {
                prop_assert!(row.miscompare);
                prop_assert_eq!(row.severity, Severity::High);
            }
            prop_assert_eq!(row.miscompare, row.severity != Severity::None);
        }
    }

    #[test]
    fn summary_matches_rows(input in input()) {
        let result = run(&input).unwrap();
        let s = &result.summary;
        prop_assert_eq!(s.total_units, result.rows.len());
        prop_assert_eq!(s.miscompares, result.rows.iter().filter(|r| r.miscompare).count());
        prop_assert_eq!(s.by_state.values().sum::<usize>(), s.total_units);
        prop_assert_eq!(s.by_lock.values().sum::<usize>(), s.total_units);
        prop_assert_eq!(s.by_severity.values().sum::<usize>(), s.total_units);
        prop_assert_eq!(s.high_severity + s.medium_severity, s.miscompares);
    }
}
