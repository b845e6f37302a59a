use async_trait::async_trait;
use serde_json::{json, Value};

use super::{invalid_payload, ValidationStrategy};
use crate::domain::{DetailedFeedback, ExerciseKind, Verdict};
use crate::grading::answer::FreeText;
use crate::grading::helpers::StrategyHelpers;
use crate::grading::payload::{DictationPayload, ExercisePayload};
use crate::grading::similarity::percent;

/// Dictation. Scored as recall: learner words that occur in the reference,
/// over the number of reference words. Word order is not penalised; each
/// reference word can be matched once.
pub struct DictationStrategy;

fn lower_words(s: &str) -> Vec<String> {
  s.split_whitespace().map(str::to_lowercase).collect()
}

#[async_trait]
impl ValidationStrategy for DictationStrategy {
  fn kind(&self) -> ExerciseKind {
    ExerciseKind::Dictation
  }

  async fn validate(&self, payload: &Value, answer: &Value, helpers: &StrategyHelpers) -> Verdict {
    let Some(payload) = DictationPayload::from_raw(payload) else {
      return invalid_payload(DictationPayload::KIND);
    };
    let typed = match FreeText::try_from(answer) {
      Ok(FreeText(text)) => text.trim().to_string(),
      Err(e) => return Verdict::rejected(e.to_string()),
    };
    let reference = payload.transcript.trim();

    let reference_words = lower_words(reference);
    let mut unmatched = reference_words.clone();
    let mut hits = 0;
    for word in lower_words(&typed) {
      if let Some(pos) = unmatched.iter().position(|w| *w == word) {
        unmatched.swap_remove(pos);
        hits += 1;
      }
    }
    let score = percent(hits, reference_words.len());

    let ctx = helpers.build_context();
    let feedback = helpers.feedback(&helpers.prompt(self.kind(), reference, &typed), &ctx).await;

    helpers.scored(self.kind(), score, feedback).with_detail(DetailedFeedback {
      correct_answer: Some(json!(reference)),
      explanation: None,
      hints: None,
    })
  }
}
