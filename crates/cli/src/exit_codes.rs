//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success (no miscompares at or above `fail_on`)      |
//! | 1    | Miscompares at or above `fail_on` were found        |
//! | 2    | CLI usage error (bad args, cannot write output)     |
//! | 3    | Invalid or unreadable audit config                  |
//! | 4    | Loader failure (unreadable source, missing column)  |
//! | 5    | Engine failure (empty or duplicate unit identifier) |

use lockaudit_recon::{ReconError, Stage};

/// Success - command completed, nothing at or above the failure threshold.
pub const EXIT_SUCCESS: u8 = 0;

/// Audit found miscompares at or above the configured `fail_on` severity.
/// Like `diff(1)`, exit 1 means "sources disagree."
pub const EXIT_AUDIT_MISCOMPARE: u8 = 1;

/// Usage error - bad arguments, output path not writable.
pub const EXIT_USAGE: u8 = 2;

/// Audit config cannot be read, parsed, or validated.
pub const EXIT_AUDIT_INVALID_CONFIG: u8 = 3;

/// A source file cannot be read or lacks a required column.
pub const EXIT_AUDIT_LOADER: u8 = 4;

/// The engine rejected the loaded records.
pub const EXIT_AUDIT_ENGINE: u8 = 5;

/// Map an engine-crate error to its exit code by pipeline stage.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err.stage() {
        Stage::Config => EXIT_AUDIT_INVALID_CONFIG,
        Stage::Loader => EXIT_AUDIT_LOADER,
        Stage::Engine => EXIT_AUDIT_ENGINE,
    }
}
