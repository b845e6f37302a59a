//! Strategy dispatcher: loads the exercise, builds the capability bundle and
//! hands the answer to the strategy registered for the exercise kind.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::config::Prompts;
use crate::domain::{Language, Verdict};
use crate::grading::error::ValidationError;
use crate::grading::generator::{ContextExtras, ContextScope, CurrentContent, LlmContext, TextGenerator};
use crate::grading::helpers::{HistoryLookup, StrategyHelpers};
use crate::grading::store::{AttemptHistory, ExerciseRepository};
use crate::grading::strategies::StrategyRegistry;
use crate::grading::thresholds::ThresholdTable;

pub const DONT_KNOW_FEEDBACK: &str =
  "You chose \"I don't know\". Review the content. Do you want deeper explanation?";

#[derive(Clone)]
pub struct AnswerValidator {
  exercises: Arc<dyn ExerciseRepository>,
  generator: Arc<dyn TextGenerator>,
  history: Option<Arc<dyn AttemptHistory>>,
  strategies: StrategyRegistry,
  thresholds: ThresholdTable,
  prompts: Arc<Prompts>,
}

impl AnswerValidator {
  pub fn new(exercises: Arc<dyn ExerciseRepository>, generator: Arc<dyn TextGenerator>) -> Self {
    Self {
      exercises,
      generator,
      history: None,
      strategies: StrategyRegistry::default(),
      thresholds: ThresholdTable::default(),
      prompts: Arc::new(Prompts::default()),
    }
  }

  pub fn with_history(mut self, history: Arc<dyn AttemptHistory>) -> Self {
    self.history = Some(history);
    self
  }

  pub fn with_strategies(mut self, strategies: StrategyRegistry) -> Self {
    self.strategies = strategies;
    self
  }

  pub fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
    self.thresholds = thresholds;
    self
  }

  pub fn with_prompts(mut self, prompts: Arc<Prompts>) -> Self {
    self.prompts = prompts;
    self
  }

  /// Grade `answer` for exercise `exercise_id`.
  ///
  /// A "don't know" submission short-circuits before any lookup. Unknown
  /// exercises and kinds without a strategy are errors; everything the learner
  /// can get wrong comes back as a verdict.
  #[instrument(level = "info", target = "grading", skip_all, fields(%exercise_id, %is_dont_know, %language))]
  pub async fn validate_answer(
    &self,
    exercise_id: u64,
    answer: &Value,
    is_dont_know: bool,
    language: Language,
    extras: &ContextExtras,
  ) -> Result<Verdict, ValidationError> {
    if is_dont_know {
      debug!(target: "grading", %exercise_id, "Don't-know submission; skipping grading");
      return Ok(Verdict::rejected(DONT_KNOW_FEEDBACK));
    }

    let exercise = self
      .exercises
      .find_exercise(exercise_id)
      .await?
      .ok_or(ValidationError::ExerciseNotFound(exercise_id))?;

    let Some(strategy) = self.strategies.get(exercise.kind) else {
      error!(target: "grading", %exercise_id, kind = ?exercise.kind, "No validation strategy registered for exercise kind");
      return Err(ValidationError::UnsupportedKind(exercise.kind));
    };

    let context = LlmContext {
      learner_id: extras.learner_id.unwrap_or(0),
      module_id: extras.module_id.unwrap_or(0),
      segment_id: extras.segment_id,
      exercise_id: Some(exercise.id),
      learner_language: language,
      learner_interests: extras.learner_interests.clone(),
      scope: extras.scope.unwrap_or(ContextScope::CurrentExercise),
      current_content: Some(CurrentContent {
        exercise_title: exercise.title.clone(),
        exercise_content: exercise.payload.clone(),
      }),
    };

    let mut helpers = StrategyHelpers::new(context, self.generator.clone())
      .with_thresholds(self.thresholds.clone())
      .with_prompts(self.prompts.clone());
    if let Some(history) = &self.history {
      helpers = helpers.with_history(HistoryLookup::new(history.clone(), exercise.id, extras.learner_id));
    }

    let verdict = strategy.validate(&exercise.payload, answer, &helpers).await;
    info!(target: "grading", %exercise_id, kind = %exercise.kind, score = verdict.score, is_correct = verdict.is_correct, "Answer graded");
    Ok(verdict)
  }
}


#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::testing::CountingExercises;
  use super::*;
  use crate::domain::{Exercise, ExerciseKind};
  use crate::grading::generator::testing::ScriptedGenerator;
  use crate::grading::helpers::FEEDBACK_UNAVAILABLE;
  use crate::grading::store::testing::UnavailableStore;
  use crate::grading::store::StoreError;
  use crate::grading::strategies::ClozeStrategy;

  fn cloze_exercise() -> Exercise {
    Exercise {
      id: 11,
      title: "Кітапхана".into(),
      kind: ExerciseKind::Cloze,
      payload: json!({ "sentences": [
        { "text": "Мен ___ оқимын.", "answers": ["кітап"] },
        { "text": "Маған ___ ұнайды.", "answers": ["оқу"] }
      ]}),
    }
  }

  #[tokio::test]
  async fn dont_know_skips_lookup_and_grading() {
    let exercises = Arc::new(CountingExercises::with(vec![cloze_exercise()]));
    let generator = Arc::new(ScriptedGenerator::replying("unused"));
    let validator = AnswerValidator::new(exercises.clone(), generator.clone());

    let v = validator
      .validate_answer(11, &json!(["кітап", "оқу"]), true, Language::Kazakh, &ContextExtras::default())
      .await
      .unwrap();

    assert_eq!(v, Verdict::rejected(DONT_KNOW_FEEDBACK));
    assert_eq!(exercises.lookups(), 0);
    assert_eq!(generator.calls(), 0);
  }

  #[tokio::test]
  async fn dont_know_ignores_missing_exercise() {
    let validator = AnswerValidator::new(Arc::new(CountingExercises::default()), Arc::new(ScriptedGenerator::failing()));
    let v = validator.validate_answer(999, &Value::Null, true, Language::English, &ContextExtras::default()).await;
    assert_eq!(v.unwrap().score, 0);
  }

  #[tokio::test]
  async fn unknown_exercise_is_an_error() {
    let validator = AnswerValidator::new(Arc::new(CountingExercises::default()), Arc::new(ScriptedGenerator::replying("x")));
    let err = validator
      .validate_answer(404, &json!([]), false, Language::English, &ContextExtras::default())
      .await
      .unwrap_err();
    assert!(matches!(err, ValidationError::ExerciseNotFound(404)));
    assert_eq!(err.to_string(), "Exercise 404 not found");
  }

  #[tokio::test]
  async fn store_failure_surfaces_as_lookup_error() {
    let generator = Arc::new(ScriptedGenerator::replying("unused"));
    let validator = AnswerValidator::new(Arc::new(UnavailableStore), generator.clone());
    let err = validator
      .validate_answer(11, &json!(["кітап"]), false, Language::English, &ContextExtras::default())
      .await
      .unwrap_err();
    assert!(matches!(err, ValidationError::Lookup(StoreError::Unavailable(_))));
    assert_eq!(err.to_string(), "exercise lookup failed: store unavailable: connection refused");
    assert_eq!(generator.calls(), 0);
  }

  #[tokio::test]
  async fn kind_without_strategy_is_an_error() {
    let mut registry = StrategyRegistry::empty();
    registry.register(Arc::new(ClozeStrategy));
    let dictation = Exercise {
      id: 5,
      title: String::new(),
      kind: ExerciseKind::Dictation,
      payload: json!({ "transcript": "сәлем" }),
    };
    let validator = AnswerValidator::new(Arc::new(CountingExercises::with(vec![dictation])), Arc::new(ScriptedGenerator::replying("x")))
      .with_strategies(registry);

    let err = validator
      .validate_answer(5, &json!("сәлем"), false, Language::English, &ContextExtras::default())
      .await
      .unwrap_err();
    assert!(matches!(err, ValidationError::UnsupportedKind(ExerciseKind::Dictation)));
  }

  #[tokio::test]
  async fn context_merges_exercise_and_caller_extras() {
    let generator = Arc::new(ScriptedGenerator::replying("Жақсы!"));
    let validator = AnswerValidator::new(Arc::new(CountingExercises::with(vec![cloze_exercise()])), generator.clone());
    let extras = ContextExtras {
      learner_id: Some(42),
      module_id: Some(3),
      segment_id: Some(9),
      learner_interests: vec!["football".into()],
      scope: None,
    };

    let v = validator
      .validate_answer(11, &json!(["кітап", "жазу"]), false, Language::Russian, &extras)
      .await
      .unwrap();

    assert_eq!(v.score, 50);
    assert!(!v.is_correct);
    let ctx = generator.last_context().unwrap();
    assert_eq!(ctx.learner_id, 42);
    assert_eq!(ctx.module_id, 3);
    assert_eq!(ctx.segment_id, Some(9));
    assert_eq!(ctx.exercise_id, Some(11));
    assert_eq!(ctx.learner_language, Language::Russian);
    assert_eq!(ctx.scope, ContextScope::CurrentExercise);
    assert_eq!(ctx.learner_interests, vec!["football".to_string()]);
    assert_eq!(ctx.current_content.unwrap().exercise_title, "Кітапхана");
    assert!(generator.last_prompt().unwrap().contains("in Russian"));
  }

  #[tokio::test]
  async fn threshold_overrides_flow_into_verdict() {
    let overrides = std::collections::HashMap::from([(ExerciseKind::Cloze, 50)]);
    let validator = AnswerValidator::new(Arc::new(CountingExercises::with(vec![cloze_exercise()])), Arc::new(ScriptedGenerator::replying("ok")))
      .with_thresholds(ThresholdTable::with_overrides(&overrides));
    let v = validator
      .validate_answer(11, &json!(["кітап", "жазу"]), false, Language::English, &ContextExtras::default())
      .await
      .unwrap();
    assert!(v.is_correct);
  }

  #[tokio::test]
  async fn every_kind_survives_a_failing_generator() {
    let cases = vec![
      (ExerciseKind::Flashcard, json!({ "cards": [{ "word": "су", "definition": "water", "exampleSentence": "Су ішемін." }] }), json!(null), 100),
      (ExerciseKind::Cloze, cloze_exercise().payload, json!(["кітап", "жазу"]), 50),
      (ExerciseKind::SentenceReorder, json!({ "fragments": ["Мен", "үйге", "барамын"] }), json!(["Мен", "үйге", "барамын"]), 100),
      (ExerciseKind::MultipleChoice, json!({ "questions": [{ "question": "q", "options": [{ "answer": "a", "isCorrect": true }, { "answer": "b", "isCorrect": false }] }] }), json!([1]), 0),
      (ExerciseKind::Dictation, json!({ "transcript": "бір екі" }), json!("бір"), 50),
      (ExerciseKind::ListeningQuiz, json!({ "questions": [{ "question": "q", "options": [{ "answer": "a", "correct": true }] }] }), json!([0]), 100),
      (ExerciseKind::PictureDescription, json!({ "prompt": "p", "expectedKeywords": ["ит", "мысық"] }), json!("ит жүгіреді"), 50),
      (ExerciseKind::Pronunciation, json!({ "text": "мен кітап оқимын" }), json!({ "transcript": "мен кітап оқимын" }), 100),
    ];

    for (i, (kind, payload, answer, expected_score)) in cases.into_iter().enumerate() {
      let id = i as u64 + 1;
      let exercise = Exercise { id, title: String::new(), kind, payload };
      let validator = AnswerValidator::new(Arc::new(CountingExercises::with(vec![exercise])), Arc::new(ScriptedGenerator::failing()));
      let v = validator
        .validate_answer(id, &answer, false, Language::English, &ContextExtras::default())
        .await
        .unwrap();
      assert_eq!(v.score, expected_score, "{kind}");
      assert_eq!(v.feedback, FEEDBACK_UNAVAILABLE, "{kind}");
    }
  }

  #[tokio::test]
  async fn same_input_same_score() {
    let validator = AnswerValidator::new(Arc::new(CountingExercises::with(vec![cloze_exercise()])), Arc::new(ScriptedGenerator::replying("ok")));
    let answer = json!(["кітап", "оқу"]);
    let first = validator.validate_answer(11, &answer, false, Language::English, &ContextExtras::default()).await.unwrap();
    let second = validator.validate_answer(11, &answer, false, Language::English, &ContextExtras::default()).await.unwrap();
    assert_eq!((first.score, first.is_correct), (second.score, second.is_correct));
  }
}
