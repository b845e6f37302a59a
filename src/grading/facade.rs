//! Interactive (chat) and scheduled (daily task) entry points. Both grade
//! exactly the same way; they only differ in the envelope around the verdict.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::domain::{Language, Verdict};
use crate::grading::dispatcher::AnswerValidator;
use crate::grading::error::ValidationError;
use crate::grading::generator::ContextExtras;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMode {
  Interactive,
  Scheduled,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
  pub exercise_id: u64,
  #[serde(default)]
  pub answer: Value,
  #[serde(default)]
  pub is_dont_know: bool,
  #[serde(default)]
  pub language: Language,
  #[serde(flatten)]
  pub extras: ContextExtras,
}

/// Slots for an assistant follow-up in chat. Nothing fills them yet.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveExtras {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assistant_message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assistant_image_url: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledExtras {
  pub skip_attempt_recording: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEnvelope {
  pub result: Verdict,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub interactive: Option<InteractiveExtras>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scheduled: Option<ScheduledExtras>,
}

impl ValidationEnvelope {
  /// Whether the caller should persist this attempt.
  pub fn should_record(&self) -> bool {
    !self.scheduled.as_ref().is_some_and(|s| s.skip_attempt_recording)
  }
}

#[derive(Clone)]
pub struct ValidationFacade {
  core: Arc<AnswerValidator>,
}

impl ValidationFacade {
  pub fn new(core: Arc<AnswerValidator>) -> Self {
    Self { core }
  }

  #[instrument(level = "debug", target = "grading", skip_all, fields(?mode, exercise_id = request.exercise_id))]
  pub async fn validate(&self, mode: ValidationMode, request: &ValidationRequest) -> Result<ValidationEnvelope, ValidationError> {
    let result = self
      .core
      .validate_answer(request.exercise_id, &request.answer, request.is_dont_know, request.language, &request.extras)
      .await?;

    Ok(match mode {
      ValidationMode::Interactive => ValidationEnvelope {
        result,
        interactive: Some(InteractiveExtras::default()),
        scheduled: None,
      },
      ValidationMode::Scheduled => ValidationEnvelope {
        result,
        interactive: None,
        scheduled: Some(ScheduledExtras { skip_attempt_recording: false }),
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::domain::{Exercise, ExerciseKind};
  use crate::grading::dispatcher::testing::CountingExercises;
  use crate::grading::generator::testing::ScriptedGenerator;

  fn facade() -> ValidationFacade {
    let exercise = Exercise {
      id: 3,
      title: "Сөз тәртібі".into(),
      kind: ExerciseKind::SentenceReorder,
      payload: json!({ "fragments": ["Мен", "мектепке", "барамын"] }),
    };
    let core = AnswerValidator::new(Arc::new(CountingExercises::with(vec![exercise])), Arc::new(ScriptedGenerator::replying("Дұрыс!")));
    ValidationFacade::new(Arc::new(core))
  }

  fn request() -> ValidationRequest {
    serde_json::from_value(json!({
      "exerciseId": 3,
      "answer": ["Мен", "мектепке", "барамын"],
      "language": "KAZAKH",
      "learnerId": 12
    }))
    .unwrap()
  }

  #[tokio::test]
  async fn modes_share_the_verdict() {
    let f = facade();
    let chat = f.validate(ValidationMode::Interactive, &request()).await.unwrap();
    let daily = f.validate(ValidationMode::Scheduled, &request()).await.unwrap();

    assert_eq!(chat.result, daily.result);
    assert_eq!(chat.result.score, 100);
    assert_eq!(chat.interactive, Some(InteractiveExtras::default()));
    assert_eq!(chat.scheduled, None);
    assert_eq!(daily.scheduled, Some(ScheduledExtras { skip_attempt_recording: false }));
    assert!(daily.should_record());
  }

  #[tokio::test]
  async fn envelope_wire_shape() {
    let env = facade().validate(ValidationMode::Scheduled, &request()).await.unwrap();
    let v = serde_json::to_value(&env).unwrap();
    assert_eq!(v["result"]["isCorrect"], true);
    assert_eq!(v["scheduled"]["skipAttemptRecording"], false);
    assert!(v.get("interactive").is_none());
  }

  #[tokio::test]
  async fn errors_pass_through() {
    let mut req = request();
    req.exercise_id = 77;
    let err = facade().validate(ValidationMode::Interactive, &req).await.unwrap_err();
    assert!(matches!(err, ValidationError::ExerciseNotFound(77)));
  }

  #[test]
  fn request_defaults() {
    let req: ValidationRequest = serde_json::from_value(json!({ "exerciseId": 1 })).unwrap();
    assert_eq!(req.answer, Value::Null);
    assert!(!req.is_dont_know);
    assert_eq!(req.language, Language::English);
    assert_eq!(req.extras, ContextExtras::default());
  }
}
