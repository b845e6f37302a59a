//! Flashcard review. Reviewing is the whole exercise, so it always passes.

use async_trait::async_trait;
use serde_json::Value;

use super::{invalid_payload, ValidationStrategy};
use crate::domain::{ExerciseKind, Verdict};
use crate::grading::helpers::StrategyHelpers;
use crate::grading::payload::{ExercisePayload, FlashcardPayload};

pub struct FlashcardStrategy;

#[async_trait]
impl ValidationStrategy for FlashcardStrategy {
  fn kind(&self) -> ExerciseKind {
    ExerciseKind::Flashcard
  }

  async fn validate(&self, payload: &Value, _answer: &Value, helpers: &StrategyHelpers) -> Verdict {
    let Some(payload) = FlashcardPayload::from_raw(payload) else {
      return invalid_payload(FlashcardPayload::KIND);
    };

    let cards = payload
      .cards
      .iter()
      .map(|c| format!("{}: {}", c.word, c.definition))
      .collect::<Vec<_>>()
      .join("; ");
    let ctx = helpers.build_context();
    let feedback = helpers.feedback(&helpers.prompt(self.kind(), &cards, ""), &ctx).await;

    Verdict { is_correct: true, score: 100, feedback, detailed_feedback: None }
  }
}
