//! Minimal OpenAI client used as the coaching-text generator.
//!
//! We only call chat.completions and request plain text. Calls are instrumented
//! and log model name, latency and response size (not contents).
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::Prompts;
use crate::grading::generator::{GenerationError, LlmContext, TextGenerator};
use crate::util::fill_template;

const FEEDBACK_TEMPERATURE: f32 = 0.3;

#[derive(Clone)]
pub struct OpenAiGenerator {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub feedback_model: String,
  system_template: String,
}

impl OpenAiGenerator {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env(prompts: &Prompts) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let feedback_model =
      std::env::var("OPENAI_FEEDBACK_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, feedback_model, system_template: prompts.feedback_system.clone() })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.feedback_model))]
  async fn chat_plain(&self, system: &str, user: &str, temperature: f32) -> Result<String, GenerationError> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let req = ChatCompletionRequest {
      model: self.feedback_model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      max_tokens: Some(400),
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "lingua-grader/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await
      .map_err(|e| GenerationError::Transport(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(GenerationError::Status { status, message });
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| GenerationError::Transport(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.as_deref())
      .map(str::trim)
      .unwrap_or_default()
      .to_string();
    info!(elapsed = ?start.elapsed(), reply_len = text.len(), "Model response received");

    if text.is_empty() {
      return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
  }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
  #[instrument(level = "debug", skip(self, prompt, context), fields(prompt_len = prompt.len(), exercise_id = ?context.exercise_id))]
  async fn generate(&self, prompt: &str, context: &LlmContext) -> Result<String, GenerationError> {
    let system = system_message(&self.system_template, context);
    self.chat_plain(&system, prompt, FEEDBACK_TEMPERATURE).await
  }
}

/// System message: the configured tutor persona plus what we know about the
/// learner and the exercise in focus.
pub fn system_message(template: &str, context: &LlmContext) -> String {
  let language = context.learner_language.to_string();
  let mut out = fill_template(template, &[("language", &language)]);

  let scope = serde_json::to_value(context.scope)
    .ok()
    .and_then(|v| v.as_str().map(str::to_string))
    .unwrap_or_default();
  out.push_str(&format!("\n\nFocus: {}", scope));
  if let Some(content) = &context.current_content {
    if !content.exercise_title.is_empty() {
      out.push_str(&format!("\nExercise: {}", content.exercise_title));
    }
  }
  if !context.learner_interests.is_empty() {
    out.push_str(&format!("\nLearner interests: {}", context.learner_interests.join(", ")));
  }
  out
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
