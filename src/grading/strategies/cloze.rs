use async_trait::async_trait;
use serde_json::{json, Value};

use super::{excerpt, invalid_payload, ValidationStrategy};
use crate::domain::{DetailedFeedback, ExerciseKind, Verdict};
use crate::grading::answer::TextList;
use crate::grading::helpers::StrategyHelpers;
use crate::grading::payload::{ClozePayload, ExercisePayload};
use crate::grading::similarity::percent;

/// Fill-in-the-blank: one learner entry per sentence, matched trimmed and
/// case-insensitively against that sentence's accepted answers.
pub struct ClozeStrategy;

fn fold(s: &str) -> String {
  s.trim().to_lowercase()
}

#[async_trait]
impl ValidationStrategy for ClozeStrategy {
  fn kind(&self) -> ExerciseKind {
    ExerciseKind::Cloze
  }

  async fn validate(&self, payload: &Value, answer: &Value, helpers: &StrategyHelpers) -> Verdict {
    let Some(payload) = ClozePayload::from_raw(payload) else {
      return invalid_payload(ClozePayload::KIND);
    };
    let blanks = match TextList::try_from(answer) {
      Ok(TextList(blanks)) => blanks,
      Err(e) => return Verdict::rejected(e.to_string()),
    };

    let mut correct = 0;
    let mut details = Vec::with_capacity(payload.sentences.len());
    for (i, sentence) in payload.sentences.iter().enumerate() {
      let given = fold(blanks.get(i).map(String::as_str).unwrap_or_default());
      if sentence.answers.iter().any(|a| fold(a) == given) {
        correct += 1;
        details.push(format!("Sentence {}: OK", i + 1));
      } else {
        details.push(format!("Sentence {}: expected one of: {}", i + 1, sentence.answers.join(", ")));
      }
    }
    let score = percent(correct, payload.sentences.len());

    let ctx = helpers.build_context();
    let prompt = helpers.prompt(self.kind(), &excerpt(&payload.sentences), &excerpt(&blanks));
    let feedback = helpers.feedback(&prompt, &ctx).await;

    let accepted: Vec<&Vec<String>> = payload.sentences.iter().map(|s| &s.answers).collect();
    helpers.scored(self.kind(), score, feedback).with_detail(DetailedFeedback {
      correct_answer: Some(json!(accepted)),
      explanation: Some(details.join("\n")),
      hints: None,
    })
  }
}
