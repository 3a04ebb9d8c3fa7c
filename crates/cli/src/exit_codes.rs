//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | General error (unspecified)               |
//! | 2    | CLI usage error (bad args, missing file)  |
//! | 3    | Unsupported input file type               |
//! | 4    | No master data available                  |
//! | 5    | Master store is empty                     |
//! | 6    | Runtime error (IO, storage, spreadsheet)  |

use feascheck_engine::error::FeasError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file extension not recognized.
pub const EXIT_UNSUPPORTED_FILE: u8 = 3;

/// No master data available from either source.
pub const EXIT_NO_MASTER: u8 = 4;

/// Master source resolved but holds zero rows.
pub const EXIT_EMPTY_MASTER: u8 = 5;

/// Runtime error: IO, storage, spreadsheet, config.
pub const EXIT_RUNTIME: u8 = 6;

/// Map a core error onto its registered exit code.
pub fn feas_exit_code(err: &FeasError) -> u8 {
    match err {
        FeasError::UnsupportedFileType(_) => EXIT_UNSUPPORTED_FILE,
        FeasError::NoMasterData => EXIT_NO_MASTER,
        FeasError::EmptyMasterData => EXIT_EMPTY_MASTER,
        FeasError::Storage(_)
        | FeasError::Sheet(_)
        | FeasError::Io(_)
        | FeasError::ConfigParse(_) => EXIT_RUNTIME,
    }
}
