//! Per-call capability bundle handed to a strategy: learner language, the
//! generator context, a feedback call that cannot fail, and (for speech
//! exercises) a lookup of the latest stored transcription.

use std::sync::Arc;

use tracing::{error, warn};

use crate::config::Prompts;
use crate::domain::{ExerciseKind, Language, Verdict};
use crate::grading::generator::{LlmContext, TextGenerator};
use crate::grading::store::{AttemptHistory, Transcription};
use crate::grading::thresholds::ThresholdTable;
use crate::util::{fill_template, trunc_for_log};

/// Returned in place of coaching text whenever the generator fails.
pub const FEEDBACK_UNAVAILABLE: &str =
  "Detailed feedback is unavailable right now. Your answer was still scored as usual.";

/// Latest-transcription lookup bound to one exercise (and learner, if known).
#[derive(Clone)]
pub struct HistoryLookup {
  history: Arc<dyn AttemptHistory>,
  exercise_id: u64,
  learner_id: Option<u64>,
}

impl HistoryLookup {
  pub fn new(history: Arc<dyn AttemptHistory>, exercise_id: u64, learner_id: Option<u64>) -> Self {
    Self { history, exercise_id, learner_id }
  }
}

#[derive(Clone)]
pub struct StrategyHelpers {
  pub language: Language,
  context: LlmContext,
  generator: Arc<dyn TextGenerator>,
  thresholds: ThresholdTable,
  prompts: Arc<Prompts>,
  history: Option<HistoryLookup>,
}

impl StrategyHelpers {
  pub fn new(context: LlmContext, generator: Arc<dyn TextGenerator>) -> Self {
    Self {
      language: context.learner_language,
      context,
      generator,
      thresholds: ThresholdTable::default(),
      prompts: Arc::new(Prompts::default()),
      history: None,
    }
  }

  pub fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
    self.thresholds = thresholds;
    self
  }

  pub fn with_prompts(mut self, prompts: Arc<Prompts>) -> Self {
    self.prompts = prompts;
    self
  }

  pub fn with_history(mut self, lookup: HistoryLookup) -> Self {
    self.history = Some(lookup);
    self
  }

  /// Generator context for this exercise and learner.
  pub fn build_context(&self) -> LlmContext {
    self.context.clone()
  }

  /// Fill the kind's feedback template with the learner language, payload excerpt and answer.
  pub fn prompt(&self, kind: ExerciseKind, payload: &str, answer: &str) -> String {
    let language = self.language.to_string();
    fill_template(
      self.prompts.for_kind(kind),
      &[("language", &language), ("payload", payload), ("answer", answer)],
    )
  }

  /// Ask the generator for coaching text. Never fails: errors are logged and
  /// replaced by [`FEEDBACK_UNAVAILABLE`].
  pub async fn feedback(&self, prompt: &str, context: &LlmContext) -> String {
    match self.generator.generate(prompt, context).await {
      Ok(text) => text,
      Err(e) => {
        error!(
          target: "grading",
          exercise_id = ?context.exercise_id,
          prompt = %trunc_for_log(prompt, 80),
          error = %e,
          "Feedback generation failed; using fallback text"
        );
        FEEDBACK_UNAVAILABLE.to_string()
      }
    }
  }

  /// Most recent stored transcription for this exercise, if a lookup was provided.
  /// Lookup failures are logged and read as "nothing stored".
  pub async fn latest_transcription(&self) -> Option<Transcription> {
    let lookup = self.history.as_ref()?;
    match lookup.history.latest_transcription(lookup.exercise_id, lookup.learner_id).await {
      Ok(found) => found,
      Err(e) => {
        warn!(target: "grading", exercise_id = lookup.exercise_id, error = %e, "Attempt history lookup failed");
        None
      }
    }
  }

  /// Verdict whose correctness follows the kind's pass threshold.
  pub fn scored(&self, kind: ExerciseKind, score: u8, feedback: String) -> Verdict {
    Verdict {
      is_correct: self.thresholds.passes(kind, score),
      score,
      feedback,
      detailed_feedback: None,
    }
  }
}


#[cfg(test)]
mod tests {
  use super::testing::helpers;
  use super::*;
  use crate::grading::generator::testing::ScriptedGenerator;

  #[tokio::test]
  async fn feedback_falls_back_when_generator_fails() {
    let h = helpers(Arc::new(ScriptedGenerator::failing()));
    let ctx = h.build_context();
    assert_eq!(h.feedback("prompt", &ctx).await, FEEDBACK_UNAVAILABLE);
  }

  #[tokio::test]
  async fn feedback_passes_generator_text_through() {
    let h = helpers(Arc::new(ScriptedGenerator::replying("Жарайсың!")));
    let ctx = h.build_context();
    assert_eq!(h.feedback("prompt", &ctx).await, "Жарайсың!");
  }

  #[tokio::test]
  async fn no_history_lookup_means_no_transcription() {
    let h = helpers(Arc::new(ScriptedGenerator::replying("ok")));
    assert_eq!(h.latest_transcription().await, None);
  }

  #[test]
  fn prompt_embeds_language_payload_and_answer() {
    let h = helpers(Arc::new(ScriptedGenerator::replying("ok")));
    let p = h.prompt(ExerciseKind::Dictation, "мен кітап оқимын", "мен кітап");
    assert!(p.contains("Language: English"));
    assert!(p.contains("Reference: \"мен кітап оқимын\""));
    assert!(p.contains("Learner: \"мен кітап\""));
  }

  #[test]
  fn scored_uses_threshold_table() {
    let h = helpers(Arc::new(ScriptedGenerator::replying("ok")));
    assert!(!h.scored(ExerciseKind::Cloze, 50, String::new()).is_correct);
    assert!(h.scored(ExerciseKind::Cloze, 70, String::new()).is_correct);
  }
}
