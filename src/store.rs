//! In-memory exercise bank and attempt log backing the grading engine's
//! lookup traits.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::ExerciseCfg;
use crate::domain::Exercise;
use crate::grading::store::{AttemptHistory, ExerciseRepository, StoreError, Transcription};

#[derive(Clone, Default)]
pub struct ExerciseBank {
  by_id: Arc<RwLock<HashMap<u64, Exercise>>>,
}

impl ExerciseBank {
  /// Bank seeded with config entries first, then built-ins for ids not taken.
  /// Config entries without a kind or payload are skipped.
  pub fn from_sources(config: &[ExerciseCfg], seeds: Vec<Exercise>) -> Self {
    let mut by_id = HashMap::<u64, Exercise>::new();

    for cfg in config {
      let (Some(kind), Some(payload)) = (cfg.kind, cfg.payload.clone()) else {
        warn!(target: "lingua_grader", id = cfg.id, "Skipping bank item: kind and payload are required.");
        continue;
      };
      by_id.insert(cfg.id, Exercise { id: cfg.id, title: cfg.title.clone().unwrap_or_default(), kind, payload });
    }
    let from_config = by_id.len();

    for seed in seeds {
      by_id.entry(seed.id).or_insert(seed);
    }
    info!(target: "lingua_grader", from_config, total = by_id.len(), "Startup exercise inventory");

    Self { by_id: Arc::new(RwLock::new(by_id)) }
  }
}

#[async_trait]
impl ExerciseRepository for ExerciseBank {
  async fn find_exercise(&self, id: u64) -> Result<Option<Exercise>, StoreError> {
    Ok(self.by_id.read().await.get(&id).cloned())
  }
}

/// One graded submission, as the service records it after validation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
  pub id: Uuid,
  pub exercise_id: u64,
  pub learner_id: Option<u64>,
  pub score: u8,
  pub is_correct: bool,
  pub transcription: Option<Transcription>,
}

/// Attempts kept per exercise; older ones are dropped as new ones arrive.
pub const MAX_ATTEMPTS_PER_EXERCISE: usize = 50;

/// Per-exercise attempt log, oldest first, bounded by [`MAX_ATTEMPTS_PER_EXERCISE`].
#[derive(Clone, Default)]
pub struct AttemptLog {
  by_exercise: Arc<RwLock<HashMap<u64, VecDeque<AttemptRecord>>>>,
}

impl AttemptLog {
  #[instrument(level = "debug", skip(self, record), fields(exercise_id = record.exercise_id, id = %record.id))]
  pub async fn record(&self, record: AttemptRecord) {
    let mut by_exercise = self.by_exercise.write().await;
    let attempts = by_exercise.entry(record.exercise_id).or_default();
    attempts.push_back(record);
    while attempts.len() > MAX_ATTEMPTS_PER_EXERCISE {
      attempts.pop_front();
    }
  }

  #[cfg(test)]
  pub async fn for_exercise(&self, exercise_id: u64) -> Vec<AttemptRecord> {
    self
      .by_exercise
      .read()
      .await
      .get(&exercise_id)
      .map(|attempts| attempts.iter().cloned().collect())
      .unwrap_or_default()
  }
}

#[async_trait]
impl AttemptHistory for AttemptLog {
  /// Transcription of the newest matching attempt only; an attempt without one
  /// hides any older transcription.
  async fn latest_transcription(
    &self,
    exercise_id: u64,
    learner_id: Option<u64>,
  ) -> Result<Option<Transcription>, StoreError> {
    let by_exercise = self.by_exercise.read().await;
    Ok(by_exercise
      .get(&exercise_id)
      .and_then(|attempts| attempts.iter().rev().find(|a| learner_id.is_none() || a.learner_id == learner_id))
      .and_then(|a| a.transcription.clone()))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::domain::ExerciseKind;
  use crate::seeds::seed_exercises;

  fn attempt(exercise_id: u64, learner_id: Option<u64>, transcript: Option<&str>) -> AttemptRecord {
    AttemptRecord {
      id: Uuid::new_v4(),
      exercise_id,
      learner_id,
      score: 50,
      is_correct: false,
      transcription: transcript.map(|t| Transcription { transcript: Some(t.into()), confidence: Some(0.7) }),
    }
  }

  #[tokio::test]
  async fn config_entries_take_precedence_over_seeds() {
    let cfg = vec![
      ExerciseCfg { id: 2, title: Some("Custom".into()), kind: Some(ExerciseKind::Dictation), payload: Some(json!({ "transcript": "сәлем" })) },
      ExerciseCfg { id: 100, title: None, kind: None, payload: Some(json!({})) },
    ];
    let bank = ExerciseBank::from_sources(&cfg, seed_exercises());

    let two = bank.find_exercise(2).await.unwrap().unwrap();
    assert_eq!(two.kind, ExerciseKind::Dictation);
    assert_eq!(two.title, "Custom");
    assert!(bank.find_exercise(100).await.unwrap().is_none());
    assert_eq!(bank.find_exercise(1).await.unwrap().unwrap().kind, ExerciseKind::Flashcard);
  }

  #[tokio::test]
  async fn latest_transcription_reads_only_the_newest_attempt() {
    let log = AttemptLog::default();
    log.record(attempt(8, Some(1), Some("бірінші"))).await;
    log.record(attempt(8, Some(2), Some("екінші"))).await;
    log.record(attempt(5, Some(2), Some("басқа"))).await;

    let any = log.latest_transcription(8, None).await.unwrap().unwrap();
    assert_eq!(any.transcript.as_deref(), Some("екінші"));
    let mine = log.latest_transcription(8, Some(1)).await.unwrap().unwrap();
    assert_eq!(mine.transcript.as_deref(), Some("бірінші"));
    assert!(log.latest_transcription(8, Some(3)).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn newer_attempt_without_transcription_hides_older_one() {
    let log = AttemptLog::default();
    log.record(attempt(8, Some(1), Some("ескі жауап"))).await;
    log.record(attempt(8, Some(1), None)).await;

    assert!(log.latest_transcription(8, Some(1)).await.unwrap().is_none());
    assert!(log.latest_transcription(8, None).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn log_keeps_only_the_newest_attempts_per_exercise() {
    let log = AttemptLog::default();
    for n in 0..MAX_ATTEMPTS_PER_EXERCISE + 5 {
      log.record(attempt(8, Some(n as u64), Some("сәлем"))).await;
    }
    log.record(attempt(5, Some(1), None)).await;

    let kept = log.for_exercise(8).await;
    assert_eq!(kept.len(), MAX_ATTEMPTS_PER_EXERCISE);
    assert_eq!(kept[0].learner_id, Some(5));
    assert_eq!(kept.last().unwrap().learner_id, Some((MAX_ATTEMPTS_PER_EXERCISE + 4) as u64));
    assert_eq!(log.for_exercise(5).await.len(), 1);
  }
}
