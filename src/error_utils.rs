//! Consistent user-facing error and warning output.

use tracing::warn;

/// Print an error the way every command reports a fatal failure.
pub fn report_error<E: std::fmt::Display>(error: &E) {
    eprintln!("ERROR: {}", error);
}

/// Report a non-fatal problem both to the log and to the user.
pub fn report_warning<E: std::fmt::Display>(warning: &E) {
    warn!("{}", warning);
    eprintln!("Warning: {}", warning);
}
