//! Core behaviors shared by both HTTP and WebSocket handlers: grade a
//! submission through the facade, then record the attempt unless the caller
//! opted out.

use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::grading::{Transcription, ValidationEnvelope, ValidationError, ValidationMode, ValidationRequest};
use crate::state::AppState;
use crate::store::AttemptRecord;

#[instrument(level = "info", skip_all, fields(?mode, exercise_id = request.exercise_id, is_dont_know = request.is_dont_know))]
pub async fn submit_answer(
  state: &AppState,
  mode: ValidationMode,
  request: &ValidationRequest,
  skip_attempt_recording: bool,
) -> Result<ValidationEnvelope, ValidationError> {
  let mut envelope = state.facade.validate(mode, request).await?;
  if let Some(scheduled) = envelope.scheduled.as_mut() {
    scheduled.skip_attempt_recording = skip_attempt_recording;
  }

  if envelope.should_record() {
    state
      .attempts
      .record(AttemptRecord {
        id: Uuid::new_v4(),
        exercise_id: request.exercise_id,
        learner_id: request.extras.learner_id,
        score: envelope.result.score,
        is_correct: envelope.result.is_correct,
        transcription: transcription_of(&request.answer),
      })
      .await;
  } else {
    debug!(target: "lingua_grader", exercise_id = request.exercise_id, "Attempt recording skipped by caller");
  }
  Ok(envelope)
}

/// Spoken answers carry their recognizer output; keep it for later lookups.
fn transcription_of(answer: &Value) -> Option<Transcription> {
  match answer {
    Value::Object(map) if map.contains_key("transcript") => serde_json::from_value(answer.clone()).ok(),
    _ => None,
  }
}
