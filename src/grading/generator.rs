//! Boundary to the external coaching-text generator.
//!
//! The engine only needs "generate learner-facing text from a prompt". Adapters
//! return a `Result`; the capability bundle turns any failure into a fixed
//! fallback string so strategies never see an error from here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::Language;

/// Which part of the course the generated text should focus on.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextScope {
  #[default]
  CurrentExercise,
  CurrentSegment,
  CurrentModule,
  TargetLanguage,
  GeneralLearning,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentContent {
  pub exercise_title: String,
  pub exercise_content: Value,
}

/// Structured context handed to the generator alongside the prompt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LlmContext {
  pub learner_id: u64,
  pub module_id: u64,
  pub segment_id: Option<u64>,
  pub exercise_id: Option<u64>,
  pub learner_language: Language,
  pub learner_interests: Vec<String>,
  pub scope: ContextScope,
  pub current_content: Option<CurrentContent>,
}

/// Caller-supplied context merged into every generator call for one validation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContextExtras {
  #[serde(default)] pub learner_id: Option<u64>,
  #[serde(default)] pub module_id: Option<u64>,
  #[serde(default)] pub segment_id: Option<u64>,
  #[serde(default)] pub learner_interests: Vec<String>,
  #[serde(default)] pub scope: Option<ContextScope>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("text generation is not configured")]
  Disabled,
  #[error("generator request failed: {0}")]
  Transport(String),
  #[error("generator HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("generator returned no text")]
  EmptyResponse,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
  async fn generate(&self, prompt: &str, context: &LlmContext) -> Result<String, GenerationError>;
}

/// Used when no generator credentials are configured: every call fails,
/// so learners get the fallback feedback and a normal score.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
  async fn generate(&self, _prompt: &str, _context: &LlmContext) -> Result<String, GenerationError> {
    Err(GenerationError::Disabled)
  }
}
