use thiserror::Error;

/// Errors raised by the grading core.
#[derive(Error, Debug)]
pub enum GradeError {
    #[error("invalid week number '{0}': expected a positive integer")]
    InvalidWeek(String),

    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },
}
