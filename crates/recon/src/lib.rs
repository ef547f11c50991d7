//! `lockaudit-recon`: self-storage lock audit engine.
//!
//! Pure engine crate: receives pre-loaded unit, rent roll and lock records,
//! returns one classified row per unit plus summary counts. No CLI or file
//! IO; the [`loader`] module only converts header-addressed text tables.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod loader;
pub mod matcher;
pub mod model;

pub use config::{AuditConfig, FailOn};
pub use engine::run;
pub use error::{ReconError, Stage};
pub use loader::Table;
pub use model::{
    AnalysisResult, AnalysisRow, AnalysisSummary, DataQualityNote, LockCategory, LockRecord,
    LockStatus, MiscompareReason, ObservedLock, OccupancyState, ReconInput, RentRollRecord,
    Severity, UnitRecord,
};
