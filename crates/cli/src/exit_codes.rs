//! CLI Exit Code Registry
//!
//! Single source of truth for the process exit codes.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Operator chose exit, or stdin reached end of input        |
//! | 1    | Fatal error (terminal I/O failed)                         |
//! | 2    | Usage error (bad flags)                                   |
//! | 130  | Interrupted with Ctrl+C                                   |
//!
//! Operation failures (missing file, bad column, write error) are not exit
//! codes: they are reported and the menu is shown again.

/// Normal exit.
pub const EXIT_SUCCESS: u8 = 0;

/// Fatal error - the session cannot continue.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments.
pub const EXIT_USAGE: u8 = 2;

/// Interrupted (128 + SIGINT).
pub const EXIT_INTERRUPTED: u8 = 130;
