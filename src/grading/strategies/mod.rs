//! # Validation strategies
//!
//! One strategy per exercise kind, all behind [`ValidationStrategy`]. A strategy:
//! 1. checks the payload shape (`Invalid <kind> payload` on mismatch),
//! 2. checks the answer shape (score-0 verdict naming the expected shape),
//! 3. computes a deterministic 0–100 score,
//! 4. asks the generator for coaching text through the capability bundle,
//! 5. optionally attaches structured detail.
//!
//! Steps 1 and 2 never reach the generator. New kinds are added by registering
//! another strategy in [`StrategyRegistry`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{ExerciseKind, Verdict};
use crate::grading::helpers::StrategyHelpers;

pub mod choice;
pub mod cloze;
pub mod dictation;
pub mod flashcard;
pub mod picture;
pub mod pronunciation;
pub mod reorder;

pub use choice::{ListeningQuizStrategy, MultipleChoiceStrategy};
pub use cloze::ClozeStrategy;
pub use dictation::DictationStrategy;
pub use flashcard::FlashcardStrategy;
pub use picture::PictureDescriptionStrategy;
pub use pronunciation::PronunciationStrategy;
pub use reorder::SentenceReorderStrategy;

#[async_trait]
pub trait ValidationStrategy: Send + Sync {
  fn kind(&self) -> ExerciseKind;

  async fn validate(&self, payload: &Value, answer: &Value, helpers: &StrategyHelpers) -> Verdict;
}

pub(crate) fn invalid_payload(kind: ExerciseKind) -> Verdict {
  Verdict::rejected(format!("Invalid {} payload", kind))
}

/// Compact JSON for prompt excerpts.
pub(crate) fn excerpt<T: serde::Serialize + ?Sized>(value: &T) -> String {
  serde_json::to_string(value).unwrap_or_default()
}

/// Kind → strategy dispatch table.
#[derive(Clone)]
pub struct StrategyRegistry {
  by_kind: HashMap<ExerciseKind, Arc<dyn ValidationStrategy>>,
}

impl StrategyRegistry {
  pub fn empty() -> Self {
    Self { by_kind: HashMap::new() }
  }

  /// Register a strategy under its own kind, replacing any previous one.
  pub fn register(&mut self, strategy: Arc<dyn ValidationStrategy>) {
    self.by_kind.insert(strategy.kind(), strategy);
  }

  pub fn get(&self, kind: ExerciseKind) -> Option<Arc<dyn ValidationStrategy>> {
    self.by_kind.get(&kind).cloned()
  }
}

impl Default for StrategyRegistry {
  fn default() -> Self {
    let mut registry = Self::empty();
    registry.register(Arc::new(FlashcardStrategy));
    registry.register(Arc::new(ClozeStrategy));
    registry.register(Arc::new(SentenceReorderStrategy));
    registry.register(Arc::new(MultipleChoiceStrategy));
    registry.register(Arc::new(DictationStrategy));
    registry.register(Arc::new(ListeningQuizStrategy));
    registry.register(Arc::new(PictureDescriptionStrategy));
    registry.register(Arc::new(PronunciationStrategy));
    registry
  }
}
