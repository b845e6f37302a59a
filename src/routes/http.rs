//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs the exercise id and basic result info.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{error, info, instrument};

use crate::grading::{ValidationError, ValidationMode};
use crate::logic::submit_answer;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(exercise_id = body.request.exercise_id))]
pub async fn http_post_chat_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmitAnswerIn>,
) -> axum::response::Response {
  answer(&state, ValidationMode::Interactive, body).await
}

#[instrument(level = "info", skip(state, body), fields(exercise_id = body.request.exercise_id))]
pub async fn http_post_daily_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmitAnswerIn>,
) -> axum::response::Response {
  answer(&state, ValidationMode::Scheduled, body).await
}

async fn answer(state: &AppState, mode: ValidationMode, body: SubmitAnswerIn) -> axum::response::Response {
  let exercise_id = body.request.exercise_id;
  match submit_answer(state, mode, &body.request, body.skip_attempt_recording).await {
    Ok(envelope) => {
      info!(target: "lingua_grader", %exercise_id, ?mode, score = envelope.result.score, is_correct = envelope.result.is_correct, "HTTP answer graded");
      Json(envelope).into_response()
    }
    Err(e) => {
      let status = status_for(&e);
      if status.is_server_error() {
        error!(target: "lingua_grader", %exercise_id, error = %e, "HTTP answer failed");
      }
      (status, Json(ErrorOut { error: e.to_string() })).into_response()
    }
  }
}

fn status_for(e: &ValidationError) -> StatusCode {
  match e {
    ValidationError::ExerciseNotFound(_) => StatusCode::NOT_FOUND,
    ValidationError::UnsupportedKind(_) => StatusCode::INTERNAL_SERVER_ERROR,
    ValidationError::Lookup(_) => StatusCode::SERVICE_UNAVAILABLE,
  }
}
