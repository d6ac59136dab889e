//! Fatal front-end errors.
//!
//! These are the only conditions that abort compilation on the spot
//! instead of being buffered for batch reporting. They propagate as
//! ordinary `Result` errors up to the driver, which prints whatever
//! diagnostics were collected and exits with status 1.

use thiserror::Error;

/// Errors that terminate the front end immediately.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FatalError {
    /// The input ran out before the program was complete.
    #[error("program incomplete")]
    ProgramIncomplete,

    /// Non-blank bytes follow the closing brace of `main`.
    #[error("redundant code after main function")]
    RedundantCode,

    /// A `!` not followed by `=`; the language has no such operator.
    #[error("operator ! is not allowed")]
    StrayBang,
}

/// Result alias used throughout the scanner and parser.
pub type ScanResult<T> = Result<T, FatalError>;
