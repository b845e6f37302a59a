//! Lookups the engine reads from but never writes to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Exercise;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("store unavailable: {0}")]
  Unavailable(String),
}

/// Speech-recognition result stored with an earlier attempt.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Transcription {
  #[serde(default)] pub transcript: Option<String>,
  #[serde(default)] pub confidence: Option<f64>,
}

#[async_trait]
pub trait ExerciseRepository: Send + Sync {
  async fn find_exercise(&self, id: u64) -> Result<Option<Exercise>, StoreError>;
}

#[async_trait]
pub trait AttemptHistory: Send + Sync {
  /// Transcription of the most recent attempt on the exercise (by the learner, when
  /// given). `None` when that attempt carried no transcription.
  async fn latest_transcription(
    &self,
    exercise_id: u64,
    learner_id: Option<u64>,
  ) -> Result<Option<Transcription>, StoreError>;
}
