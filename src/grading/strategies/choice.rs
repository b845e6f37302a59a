//! Option-index quizzes: multiple choice and listening comprehension share the
//! grading loop and differ only in how options mark the right answer.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{excerpt, invalid_payload, ValidationStrategy};
use crate::domain::{DetailedFeedback, ExerciseKind, Verdict};
use crate::grading::answer::OptionSelection;
use crate::grading::helpers::StrategyHelpers;
use crate::grading::payload::{ExercisePayload, ListeningQuizPayload, MultipleChoicePayload};
use crate::grading::similarity::percent;

/// Question reduced to what grading needs: option texts with their correctness flag.
struct Question<'a> {
  options: Vec<(&'a str, bool)>,
}

/// Returns (questions answered correctly, per-question explanation lines).
fn grade(questions: &[Question<'_>], selection: &OptionSelection) -> (usize, Vec<String>) {
  let mut correct = 0;
  let mut lines = Vec::with_capacity(questions.len());
  for (i, q) in questions.iter().enumerate() {
    let picked_right = selection
      .selected(i)
      .and_then(|idx| q.options.get(idx))
      .map(|(_, flagged)| *flagged)
      .unwrap_or(false);
    if picked_right {
      correct += 1;
      lines.push(format!("Q{}: correct", i + 1));
    } else {
      let expected = q.options.iter().find(|(_, flagged)| *flagged).map(|(text, _)| *text).unwrap_or("N/A");
      lines.push(format!("Q{}: expected {}", i + 1, expected));
    }
  }
  (correct, lines)
}

async fn finish(
  kind: ExerciseKind,
  questions: &[Question<'_>],
  selection: &OptionSelection,
  payload_excerpt: String,
  raw_answer: &Value,
  helpers: &StrategyHelpers,
) -> Verdict {
  let (correct, lines) = grade(questions, selection);
  let score = percent(correct, questions.len());

  let ctx = helpers.build_context();
  let prompt = helpers.prompt(kind, &payload_excerpt, &excerpt(raw_answer));
  let feedback = helpers.feedback(&prompt, &ctx).await;

  helpers.scored(kind, score, feedback).with_detail(DetailedFeedback {
    correct_answer: None,
    explanation: Some(lines.join("\n")),
    hints: None,
  })
}

pub struct MultipleChoiceStrategy;

#[async_trait]
impl ValidationStrategy for MultipleChoiceStrategy {
  fn kind(&self) -> ExerciseKind {
    ExerciseKind::MultipleChoice
  }

  async fn validate(&self, payload: &Value, answer: &Value, helpers: &StrategyHelpers) -> Verdict {
    let Some(payload) = MultipleChoicePayload::from_raw(payload) else {
      return invalid_payload(MultipleChoicePayload::KIND);
    };
    let selection = match OptionSelection::try_from(answer) {
      Ok(sel) => sel,
      Err(e) => return Verdict::rejected(e.to_string()),
    };

    let questions: Vec<Question<'_>> = payload
      .questions
      .iter()
      .map(|q| Question {
        options: q.options.iter().map(|o| (o.answer.as_str(), o.flagged_correct())).collect(),
      })
      .collect();
    let meta: Vec<Value> = payload
      .questions
      .iter()
      .map(|q| {
        let options: Vec<&str> = q.options.iter().map(|o| o.answer.as_str()).collect();
        json!({ "question": q.question, "options": options })
      })
      .collect();

    finish(self.kind(), &questions, &selection, excerpt(&meta), answer, helpers).await
  }
}

pub struct ListeningQuizStrategy;

#[async_trait]
impl ValidationStrategy for ListeningQuizStrategy {
  fn kind(&self) -> ExerciseKind {
    ExerciseKind::ListeningQuiz
  }

  async fn validate(&self, payload: &Value, answer: &Value, helpers: &StrategyHelpers) -> Verdict {
    let Some(payload) = ListeningQuizPayload::from_raw(payload) else {
      return invalid_payload(ListeningQuizPayload::KIND);
    };
    let selection = match OptionSelection::try_from(answer) {
      Ok(sel) => sel,
      Err(e) => return Verdict::rejected(e.to_string()),
    };

    let questions: Vec<Question<'_>> = payload
      .questions
      .iter()
      .map(|q| Question {
        options: q.options.iter().map(|o| (o.answer.as_str(), o.correct)).collect(),
      })
      .collect();
    let meta: Vec<Value> = payload.questions.iter().map(|q| json!({ "question": q.question })).collect();

    finish(self.kind(), &questions, &selection, excerpt(&meta), answer, helpers).await
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::grading::generator::testing::ScriptedGenerator;
  use crate::grading::helpers::testing::helpers;

  fn one_question(flag: &str) -> Value {
    let mut right = json!({ "answer": "book" });
    let mut wrong = json!({ "answer": "pen" });
    right[flag] = json!(true);
    wrong[flag] = json!(false);
    json!({ "questions": [{ "question": "«Кітап» сөзінің мағынасы?", "options": [right, wrong] }] })
  }

  #[tokio::test]
  async fn wrong_index_scores_zero() {
    let generator = Arc::new(ScriptedGenerator::replying("Қайталап көріңіз."));
    let v = MultipleChoiceStrategy.validate(&one_question("isCorrect"), &json!([1]), &helpers(generator)).await;
    assert_eq!(v.score, 0);
    assert!(!v.is_correct);
    assert_eq!(v.detailed_feedback.unwrap().explanation.unwrap(), "Q1: expected book");
  }

  #[tokio::test]
  async fn legacy_correct_flag_is_honoured() {
    let generator = Arc::new(ScriptedGenerator::replying("ok"));
    let v = MultipleChoiceStrategy.validate(&one_question("correct"), &json!([0]), &helpers(generator)).await;
    assert_eq!(v.score, 100);
    assert!(v.is_correct);
  }

  #[tokio::test]
  async fn out_of_range_and_skipped_indices_are_wrong() {
    let generator = Arc::new(ScriptedGenerator::replying("ok"));
    let h = helpers(generator);
    let payload = json!({ "questions": [
      { "question": "a", "options": [{ "answer": "x", "isCorrect": true }] },
      { "question": "b", "options": [{ "answer": "y", "isCorrect": true }] },
      { "question": "c", "options": [{ "answer": "z", "isCorrect": true }] }
    ]});
    let v = MultipleChoiceStrategy.validate(&payload, &json!([0, 9, null]), &h).await;
    assert_eq!(v.score, 33);
    assert_eq!(
      v.detailed_feedback.unwrap().explanation.unwrap(),
      "Q1: correct\nQ2: expected y\nQ3: expected z"
    );
  }

  #[tokio::test]
  async fn prompt_lists_questions_and_selection() {
    let generator = Arc::new(ScriptedGenerator::replying("ok"));
    MultipleChoiceStrategy.validate(&one_question("isCorrect"), &json!([1]), &helpers(generator.clone())).await;
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("\"options\":[\"book\",\"pen\"]"));
    assert!(prompt.contains("Learner selected indices: [1]"));
  }

  #[tokio::test]
  async fn string_indices_are_rejected() {
    let generator = Arc::new(ScriptedGenerator::replying("unused"));
    let v = MultipleChoiceStrategy.validate(&one_question("isCorrect"), &json!(["book"]), &helpers(generator.clone())).await;
    assert_eq!(v, Verdict::rejected("Answer must be an array of option indices"));
    assert_eq!(generator.calls(), 0);
  }

  #[tokio::test]
  async fn listening_quiz_uses_canonical_flag() {
    let generator = Arc::new(ScriptedGenerator::replying("Тыңдауды жалғастырыңыз."));
    let v = ListeningQuizStrategy.validate(&one_question("correct"), &json!([0]), &helpers(generator)).await;
    assert_eq!(v.score, 100);
    assert!(v.is_correct);
    assert_eq!(v.feedback, "Тыңдауды жалғастырыңыз.");
  }

  #[tokio::test]
  async fn listening_quiz_rejects_legacy_flag_payload() {
    let generator = Arc::new(ScriptedGenerator::replying("unused"));
    let v = ListeningQuizStrategy.validate(&one_question("isCorrect"), &json!([0]), &helpers(generator)).await;
    assert_eq!(v, Verdict::rejected("Invalid listening quiz payload"));
  }
}
