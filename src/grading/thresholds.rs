//! Pass/fail cutoffs per exercise kind. The only place that decides what counts as passing.

use std::collections::HashMap;

use crate::domain::ExerciseKind;

/// Cutoff for any kind without an explicit entry.
pub const DEFAULT_PASS_THRESHOLD: u8 = 70;

const BUILTIN_THRESHOLDS: [(ExerciseKind, u8); 7] = [
  (ExerciseKind::Cloze, 70),
  (ExerciseKind::SentenceReorder, 80),
  (ExerciseKind::MultipleChoice, 70),
  (ExerciseKind::Dictation, 80),
  (ExerciseKind::ListeningQuiz, 70),
  (ExerciseKind::PictureDescription, 60),
  (ExerciseKind::Pronunciation, 75),
];

#[derive(Clone, Debug)]
pub struct ThresholdTable {
  by_kind: HashMap<ExerciseKind, u8>,
}

impl Default for ThresholdTable {
  fn default() -> Self {
    Self { by_kind: BUILTIN_THRESHOLDS.into_iter().collect() }
  }
}

impl ThresholdTable {
  /// Built-in table with per-kind overrides applied (values above 100 are clamped).
  pub fn with_overrides(overrides: &HashMap<ExerciseKind, u8>) -> Self {
    let mut table = Self::default();
    for (kind, pct) in overrides {
      table.by_kind.insert(*kind, (*pct).min(100));
    }
    table
  }

  pub fn threshold(&self, kind: ExerciseKind) -> u8 {
    self.by_kind.get(&kind).copied().unwrap_or(DEFAULT_PASS_THRESHOLD)
  }

  pub fn passes(&self, kind: ExerciseKind, score: u8) -> bool {
    score >= self.threshold(kind)
  }
}
