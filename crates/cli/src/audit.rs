//! `lockaudit run` / `lockaudit validate`: config-driven lock audits.

use std::path::{Path, PathBuf};

use lockaudit_recon::loader::{load_locks, load_rentroll, load_units};
use lockaudit_recon::{AnalysisResult, AnalysisRow, AuditConfig, FailOn, ReconError, ReconInput};
use serde::Serialize;

use crate::exit_codes::{
    recon_exit_code, EXIT_AUDIT_INVALID_CONFIG, EXIT_AUDIT_MISCOMPARE, EXIT_USAGE,
};
use crate::source::read_table;
use crate::CliError;

/// JSON document written by `run --json` / `--output`.
#[derive(Debug, Serialize)]
pub struct AuditReport<'a> {
    pub meta: AuditMeta,
    pub result: &'a AnalysisResult,
}

#[derive(Debug, Serialize)]
pub struct AuditMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

pub struct RunOptions {
    pub json: bool,
    pub output: Option<PathBuf>,
    pub miscompares: Option<PathBuf>,
    pub fail_on: Option<FailOn>,
}

fn audit_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumn { source, .. } => {
                Some(format!("set [{source}.columns] in the audit config to match the file's headers"))
            }
            ReconError::DuplicateUnit { .. } => {
                Some("each unit must appear once in the units file".to_string())
            }
            _ => None,
        };
        CliError { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

fn read_config(config_path: &Path) -> Result<AuditConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        audit_err(EXIT_AUDIT_INVALID_CONFIG, format!("cannot read config: {e}"))
    })?;
    Ok(AuditConfig::from_toml(&config_str)?)
}

/// Load the three sources, resolving file paths relative to the config file.
pub fn load_input(config: &AuditConfig, base_dir: &Path) -> Result<ReconInput, ReconError> {
    let units = read_table("units", &base_dir.join(&config.units.file))?;
    let rentroll = read_table("rentroll", &base_dir.join(&config.rentroll.file))?;
    let locks = read_table("locks", &base_dir.join(&config.locks.file))?;

    Ok(ReconInput {
        units: load_units(&units, &config.units)?,
        rentroll: load_rentroll(&rentroll, &config.rentroll)?,
        locks: load_locks(&locks, &config.locks)?,
    })
}

pub fn cmd_run(config_path: PathBuf, opts: RunOptions) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let input = load_input(&config, base_dir)?;
    let result = lockaudit_recon::run(&input)?;

    let report = AuditReport {
        meta: AuditMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        result: &result,
    };

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| audit_err(EXIT_USAGE, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = opts.output {
        std::fs::write(path, &json_str)
            .map_err(|e| audit_err(EXIT_USAGE, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = opts.miscompares {
        write_miscompares_csv(path, &result.miscompares())
            .map_err(|e| audit_err(EXIT_USAGE, format!("cannot write miscompares: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if opts.json {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{}: {} units, {} miscompares ({:.1}%): {} high, {} medium",
        config.name, s.total_units, s.miscompares, s.miscompare_rate, s.high_severity, s.medium_severity,
    );
    if !result.notes.is_empty() {
        eprintln!("data quality: {} note(s)", result.notes.len());
    }

    let fail_on = opts.fail_on.unwrap_or(config.fail_on);
    let tripped = result.rows.iter().filter(|r| fail_on.trips(r.severity)).count();
    if tripped > 0 {
        return Err(audit_err(
            EXIT_AUDIT_MISCOMPARE,
            format!("{tripped} unit(s) at or above the failure threshold"),
        ));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    eprintln!(
        "valid: \"{}\" (units: {}, rentroll: {}, locks: {})",
        config.name, config.units.file, config.rentroll.file, config.locks.file,
    );
    Ok(())
}

const MISCOMPARE_HEADERS: [&str; 9] = [
    "Unit",
    "Unit Status",
    "Days Past Due",
    "Occupancy State",
    "Expected Lock Status",
    "Observed Lock Status",
    "Severity",
    "Reason",
    "Recommended Action",
];

/// Write miscompare rows (already priority-ordered) as CSV.
pub fn write_miscompares_csv(path: &Path, rows: &[&AnalysisRow]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(MISCOMPARE_HEADERS)?;

    for row in rows {
        let expected = row.expected.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" or ");
        writer.write_record([
            row.unit.clone(),
            row.unit_status.clone(),
            row.days_past_due.map(|d| d.to_string()).unwrap_or_default(),
            row.state.to_string(),
            expected,
            row.observed.to_string(),
            row.severity.to_string(),
            row.reason.map(|r| r.to_string()).unwrap_or_default(),
            row.recommended_action.unwrap_or_default().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
