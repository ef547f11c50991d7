use serde::Deserialize;

use crate::error::ReconError;
use crate::model::Severity;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// An audit config (`*.audit.toml`): where the three sources live and which
/// header names carry each field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    pub name: String,
    #[serde(default)]
    pub fail_on: FailOn,
    pub units: UnitsSource,
    pub rentroll: RentRollSource,
    pub locks: LocksSource,
}

/// Lowest severity that makes an audit run fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailOn {
    /// Never fail on miscompares.
    None,
    Medium,
    High,
}

impl Default for FailOn {
    fn default() -> Self {
        Self::High
    }
}

impl FailOn {
    pub fn trips(&self, severity: Severity) -> bool {
        match self {
            Self::None => false,
            Self::Medium => severity >= Severity::Medium,
            Self::High => severity >= Severity::High,
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsSource {
    pub file: String,
    #[serde(default)]
    pub columns: UnitsColumns,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RentRollSource {
    pub file: String,
    #[serde(default)]
    pub columns: RentRollColumns,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocksSource {
    pub file: String,
    #[serde(default)]
    pub columns: LocksColumns,
}

// ---------------------------------------------------------------------------
// Column mapping
//
// Each field takes a list of candidate header names; the first one present
// in the source wins.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsColumns {
    #[serde(default = "default_unit_columns")]
    pub unit: Vec<String>,
    #[serde(default = "default_status_columns")]
    pub status: Vec<String>,
}

impl Default for UnitsColumns {
    fn default() -> Self {
        Self { unit: default_unit_columns(), status: default_status_columns() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RentRollColumns {
    #[serde(default = "default_rentroll_unit_columns")]
    pub unit: Vec<String>,
    #[serde(default = "default_days_past_due_columns")]
    pub days_past_due: Vec<String>,
}

impl Default for RentRollColumns {
    fn default() -> Self {
        Self {
            unit: default_rentroll_unit_columns(),
            days_past_due: default_days_past_due_columns(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocksColumns {
    #[serde(default = "default_lock_unit_columns")]
    pub unit: Vec<String>,
    #[serde(default = "default_status_columns")]
    pub status: Vec<String>,
}

impl Default for LocksColumns {
    fn default() -> Self {
        Self { unit: default_lock_unit_columns(), status: default_status_columns() }
    }
}

fn default_unit_columns() -> Vec<String> {
    vec!["Unit".into()]
}

fn default_status_columns() -> Vec<String> {
    vec!["Status".into()]
}

fn default_rentroll_unit_columns() -> Vec<String> {
    vec!["Unit".into(), "UNIT".into()]
}

fn default_days_past_due_columns() -> Vec<String> {
    vec!["Days Past Due".into(), "DAYS PAST DUE".into()]
}

fn default_lock_unit_columns() -> Vec<String> {
    vec!["Unit Number".into()]
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        let files = [
            ("units", &self.units.file),
            ("rentroll", &self.rentroll.file),
            ("locks", &self.locks.file),
        ];
        for (source, file) in files {
            if file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{source}: file must not be empty"
                )));
            }
        }

        let columns = [
            ("units.columns.unit", &self.units.columns.unit),
            ("units.columns.status", &self.units.columns.status),
            ("rentroll.columns.unit", &self.rentroll.columns.unit),
            ("rentroll.columns.days_past_due", &self.rentroll.columns.days_past_due),
            ("locks.columns.unit", &self.locks.columns.unit),
            ("locks.columns.status", &self.locks.columns.status),
        ];
        for (key, candidates) in columns {
            if candidates.is_empty() || candidates.iter().any(|c| c.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{key}: needs at least one non-empty column name"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
