use async_trait::async_trait;
use serde_json::{json, Value};

use super::{excerpt, invalid_payload, ValidationStrategy};
use crate::domain::{DetailedFeedback, ExerciseKind, Verdict};
use crate::grading::answer::TextList;
use crate::grading::helpers::StrategyHelpers;
use crate::grading::payload::{ExercisePayload, SentenceReorderPayload};
use crate::grading::similarity::percent;

pub const NOT_A_PERMUTATION: &str = "Answer must use every fragment exactly once";

/// Sentence reordering. The learner must submit a permutation of the fragments;
/// the score counts fragments sitting at their target position.
pub struct SentenceReorderStrategy;

fn is_permutation(expected: &[String], given: &[String]) -> bool {
  if expected.len() != given.len() {
    return false;
  }
  let mut a: Vec<&String> = expected.iter().collect();
  let mut b: Vec<&String> = given.iter().collect();
  a.sort();
  b.sort();
  a == b
}

#[async_trait]
impl ValidationStrategy for SentenceReorderStrategy {
  fn kind(&self) -> ExerciseKind {
    ExerciseKind::SentenceReorder
  }

  async fn validate(&self, payload: &Value, answer: &Value, helpers: &StrategyHelpers) -> Verdict {
    let Some(payload) = SentenceReorderPayload::from_raw(payload) else {
      return invalid_payload(SentenceReorderPayload::KIND);
    };
    let order = match TextList::try_from(answer) {
      Ok(TextList(order)) => order,
      Err(e) => return Verdict::rejected(e.to_string()),
    };
    if !is_permutation(&payload.fragments, &order) {
      return Verdict::rejected(NOT_A_PERMUTATION);
    }

    let in_place = payload
      .fragments
      .iter()
      .zip(&order)
      .filter(|(want, got)| want == got)
      .count();
    let score = percent(in_place, payload.fragments.len());

    let ctx = helpers.build_context();
    let prompt = helpers.prompt(self.kind(), &excerpt(&payload.fragments), &excerpt(&order));
    let feedback = helpers.feedback(&prompt, &ctx).await;

    helpers.scored(self.kind(), score, feedback).with_detail(DetailedFeedback {
      correct_answer: Some(json!(payload.fragments.join(" "))),
      explanation: None,
      hints: None,
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::grading::generator::testing::ScriptedGenerator;
  use crate::grading::helpers::testing::helpers;

  fn fragments() -> Value {
    json!({ "fragments": ["Мен", "күнде", "кітап", "оқимын"] })
  }

  #[tokio::test]
  async fn exact_order_is_full_score() {
    let generator = Arc::new(ScriptedGenerator::replying("Дұрыс!"));
    let v = SentenceReorderStrategy
      .validate(&fragments(), &json!(["Мен", "күнде", "кітап", "оқимын"]), &helpers(generator))
      .await;
    assert_eq!(v.score, 100);
    assert!(v.is_correct);
    assert_eq!(v.detailed_feedback.unwrap().correct_answer, Some(json!("Мен күнде кітап оқимын")));
  }

  #[tokio::test]
  async fn scoring_is_positional() {
    let generator = Arc::new(ScriptedGenerator::replying("ok"));
    // swapping the middle pair keeps the first and last fragments in place
    let v = SentenceReorderStrategy
      .validate(&fragments(), &json!(["Мен", "кітап", "күнде", "оқимын"]), &helpers(generator))
      .await;
    assert_eq!(v.score, 50);
    assert!(!v.is_correct);
  }

  #[tokio::test]
  async fn non_permutations_score_zero_without_generator_call() {
    let generator = Arc::new(ScriptedGenerator::replying("unused"));
    let h = helpers(generator.clone());
    for answer in [
      json!(["Мен", "күнде", "кітап"]),
      json!(["Мен", "күнде", "кітап", "оқимын", "оқимын"]),
      json!(["Мен", "Мен", "кітап", "оқимын"]),
      json!(["Мен", "күнде", "газет", "оқимын"]),
    ] {
      let v = SentenceReorderStrategy.validate(&fragments(), &answer, &h).await;
      assert_eq!(v, Verdict::rejected(NOT_A_PERMUTATION));
    }
    assert_eq!(generator.calls(), 0);
  }

  #[tokio::test]
  async fn object_answer_is_rejected() {
    let generator = Arc::new(ScriptedGenerator::replying("unused"));
    let v = SentenceReorderStrategy.validate(&fragments(), &json!({ "order": [] }), &helpers(generator)).await;
    assert_eq!(v.score, 0);
    assert_eq!(v.feedback, "Answer must be an array of strings");
  }
}
