//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3       | Universal        | I/O error (read/write failure)           |
//! | 20-29   | run              | Config, snapshot and library errors      |
//!
//! A run that finds tier migrations still exits 0: migrations are the report,
//! not a failure.

use tiershift_recon::ReconError;

// =============================================================================
// Universal (0-3)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, no snapshot to compare against.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - cannot read a snapshot or write an output file.
pub const EXIT_IO: u8 = 3;

// =============================================================================
// Run (20-29)
// =============================================================================

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 20;

/// A snapshot row has a price or count that is not a non-negative number,
/// a mapped column is missing, or an item's value overflows.
pub const EXIT_MALFORMED_RECORD: u8 = 21;

/// The same item identity appears twice within one snapshot.
pub const EXIT_DUPLICATE_IDENTITY: u8 = 22;

/// Card library JSON could not be parsed.
pub const EXIT_LIBRARY_PARSE: u8 = 23;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingColumn { .. }
        | ReconError::MalformedRecord { .. }
        | ReconError::ValueOverflow { .. } => EXIT_MALFORMED_RECORD,
        ReconError::DuplicateIdentity(_) => EXIT_DUPLICATE_IDENTITY,
        ReconError::LibraryParse(_) => EXIT_LIBRARY_PARSE,
        ReconError::Io(_) => EXIT_IO,
    }
}
