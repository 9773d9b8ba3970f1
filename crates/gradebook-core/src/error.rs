//! Library error types.
//!
//! The grading engine itself never fails: missing or malformed numbers just
//! contribute nothing. These errors cover term labels, configuration and
//! course lookup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradebookError {
    /// A term label that is not "<Season> <Year>".
    #[error("invalid term label: {0:?}")]
    InvalidTerm(String),

    /// A GPA cutoff table that cannot be used for lookups.
    #[error("invalid GPA cutoffs: {0}")]
    InvalidCutoffs(String),

    /// A range floor outside 0–100.
    #[error("range floor must be between 0 and 100, got {0}")]
    InvalidRangeFloor(f64),

    /// No course with this id or code exists in the snapshot.
    #[error("course not found: {0}")]
    UnknownCourse(String),
}

impl GradebookError {
    /// Returns `true` if the error comes from user configuration rather than data.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            GradebookError::InvalidCutoffs(_) | GradebookError::InvalidRangeFloor(_)
        )
    }
}
