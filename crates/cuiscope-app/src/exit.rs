//! Process exit codes.

use cuiscope_domain::SessionError;

pub const EXIT_OK: i32 = 0;
/// Runtime, catalog or config error.
pub const EXIT_ERROR: i32 = 1;
/// Invalid answer or input ended before the questionnaire was complete.
pub const EXIT_INCOMPLETE: i32 = 2;
pub const EXIT_ABORTED: i32 = 3;

/// Exit code for an error returned by a use case.
pub fn error_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SessionError>() {
        Some(SessionError::Validation(_) | SessionError::Incomplete { .. }) => EXIT_INCOMPLETE,
        Some(SessionError::Aborted { .. }) => EXIT_ABORTED,
        None => EXIT_ERROR,
    }
}
