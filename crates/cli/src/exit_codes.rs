//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success — every row matched                    |
//! | 1    | General runtime error                          |
//! | 2    | CLI usage error (bad args)                     |
//! | 3    | Unmatched rows remain after both passes        |
//! | 4    | Invalid config (parse or validation failure)   |
//! | 5    | Load/parse error (unreadable file, bad layout) |
//!
//! Like `diff(1)`, a nonzero "data found" code (3) is not a failure of the
//! tool; it reports what the reconciliation found.

use matchbook_recon::ReconError;

/// Success - command completed and everything matched.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Reconciliation left unmatched rows on either side.
pub const EXIT_UNMATCHED: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Input file could not be loaded or interpreted.
pub const EXIT_LOAD: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::EmptyTable
        | ReconError::UnsupportedLayout { .. }
        | ReconError::LayoutMismatch { .. }
        | ReconError::AmountParse { .. }
        | ReconError::MissingAmount { .. } => EXIT_LOAD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchbook_recon::model::Side;

    #[test]
    fn config_errors_map_to_invalid_config() {
        assert_eq!(
            recon_exit_code(&ReconError::ConfigParse("x".into())),
            EXIT_INVALID_CONFIG
        );
        assert_eq!(
            recon_exit_code(&ReconError::ConfigValidation("x".into())),
            EXIT_INVALID_CONFIG
        );
    }

    #[test]
    fn data_errors_map_to_load() {
        assert_eq!(recon_exit_code(&ReconError::EmptyTable), EXIT_LOAD);
        assert_eq!(
            recon_exit_code(&ReconError::MissingAmount {
                side: Side::Left,
                row: 3
            }),
            EXIT_LOAD
        );
    }
}
