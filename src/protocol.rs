//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::grading::{ValidationEnvelope, ValidationRequest};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
  Ping,
  /// Graded in interactive mode, same as the chat endpoint.
  SubmitAnswer(ValidationRequest),
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
  Pong,
  AnswerResult(ValidationEnvelope),
  Error { message: String },
}

//
// HTTP request/response DTOs
//

/// Body of both answer endpoints: a [`ValidationRequest`] plus the daily-task
/// opt-out from attempt recording.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerIn {
  #[serde(flatten)]
  pub request: ValidationRequest,
  #[serde(default)]
  pub skip_attempt_recording: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
  pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
  pub ok: bool,
}
