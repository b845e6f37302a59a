use thiserror::Error;

use crate::domain::ExerciseKind;
use crate::grading::store::StoreError;

/// Faults that abort a validation call. Malformed payloads or answers are not
/// errors; they come back as score-0 verdicts.
#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Exercise {0} not found")]
  ExerciseNotFound(u64),
  #[error("No validation strategy for type {0:?}")]
  UnsupportedKind(ExerciseKind),
  #[error("exercise lookup failed: {0}")]
  Lookup(#[from] StoreError),
}
