use async_trait::async_trait;
use serde_json::Value;

use super::{invalid_payload, ValidationStrategy};
use crate::domain::{DetailedFeedback, ExerciseKind, Verdict};
use crate::grading::answer::FreeText;
use crate::grading::helpers::StrategyHelpers;
use crate::grading::payload::{ExercisePayload, PictureDescriptionPayload};
use crate::grading::similarity::percent;

/// Picture description, scored by keyword coverage: each expected keyword
/// found anywhere in the (case-folded) description counts once.
pub struct PictureDescriptionStrategy;

#[async_trait]
impl ValidationStrategy for PictureDescriptionStrategy {
  fn kind(&self) -> ExerciseKind {
    ExerciseKind::PictureDescription
  }

  async fn validate(&self, payload: &Value, answer: &Value, helpers: &StrategyHelpers) -> Verdict {
    let Some(payload) = PictureDescriptionPayload::from_raw(payload) else {
      return invalid_payload(PictureDescriptionPayload::KIND);
    };
    let description = match FreeText::try_from(answer) {
      Ok(FreeText(text)) => text.to_lowercase(),
      Err(e) => return Verdict::rejected(e.to_string()),
    };

    let (found, missing): (Vec<&String>, Vec<&String>) = payload
      .expected_keywords
      .iter()
      .partition(|k| description.contains(&k.to_lowercase()));
    let score = percent(found.len(), payload.expected_keywords.len());

    let ctx = helpers.build_context();
    let prompt = helpers.prompt(self.kind(), &payload.expected_keywords.join(", "), &description);
    let feedback = helpers.feedback(&prompt, &ctx).await;

    let found_list: Vec<&str> = found.iter().map(|k| k.as_str()).collect();
    helpers.scored(self.kind(), score, feedback).with_detail(DetailedFeedback {
      correct_answer: None,
      explanation: Some(format!("Found: {}", found_list.join(", "))),
      hints: Some(missing.iter().map(|k| format!("Try to mention: {}", k)).collect()),
    })
  }
}
