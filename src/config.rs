//! Loading grader configuration (feedback prompts, pass thresholds, exercise bank) from TOML.
//!
//! See `GraderConfig` and `Prompts` for expected schema.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::ExerciseKind;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GraderConfig {
  #[serde(default)]
  pub prompts: Prompts,
  /// Per-kind pass threshold overrides, e.g. `PRONUNCIATION = 80`.
  #[serde(default)]
  pub thresholds: HashMap<ExerciseKind, u8>,
  #[serde(default)]
  pub exercises: Vec<ExerciseCfg>,
}

/// Exercise entry accepted in TOML configuration. `payload` is kept as free
/// JSON; it is shape-checked only when an answer is graded against it.
#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseCfg {
  pub id: u64,
  #[serde(default)] pub title: Option<String>,
  #[serde(default)] pub kind: Option<ExerciseKind>,
  #[serde(default)] pub payload: Option<serde_json::Value>,
}

/// Prompt templates for coaching feedback. Placeholders: `{language}`,
/// `{payload}` (exercise excerpt) and `{answer}` (learner answer).
/// The system prompt only takes `{language}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub feedback_system: String,
  pub flashcard: String,
  pub cloze: String,
  pub sentence_reorder: String,
  pub multiple_choice: String,
  pub dictation: String,
  pub listening_quiz: String,
  pub picture_description: String,
  pub pronunciation: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      feedback_system: "You are a supportive Kazakh language tutor. Write feedback for the learner in {language}. Be brief, specific and encouraging. Plain text only, no markdown.".into(),
      flashcard: "Provide a concise (max 2 sentences) reinforcement for the reviewed flashcards in {language}. Cards: {payload}".into(),
      cloze: "Evaluate the learner cloze answers. Provide a short formative feedback in {language}. Payload: {payload}. Learner answers: {answer}. Mention common mistakes briefly.".into(),
      sentence_reorder: "Evaluate the grammatical quality and correctness of the reordered sentence in {language}. Original fragments: {payload}. Learner order: {answer}. Provide concise feedback and a correct sentence.".into(),
      multiple_choice: "Provide concise feedback (max 4 sentences) for a multiple-choice quiz in {language}. Questions: {payload}. Learner selected indices: {answer}. Indicate which are wrong and why briefly.".into(),
      dictation: "Compare learner dictation to reference. Language: {language}. Reference: \"{payload}\" Learner: \"{answer}\". Provide short feedback highlighting main differences and corrections.".into(),
      listening_quiz: "Provide brief feedback for a listening quiz in {language}. Indicate incorrect answers and suggest listening tips. Questions meta: {payload}. Learner indices: {answer}.".into(),
      picture_description: "Evaluate the learner's picture description in {language}. Expected keywords: {payload}. Description: \"{answer}\". Provide concise feedback and missing concept hints.".into(),
      pronunciation: "You are a pronunciation coach.\nLanguage: {language}.\nReference text: \"{payload}\".\nASR transcript: \"{answer}\".\nProvide concise feedback (2-4 sentences):\n- Point out missing or extra words.\n- Give 1-2 tips on articulation, stress or pace.\n- Be supportive and specific.\nReturn plain text.".into(),
    }
  }
}

impl Prompts {
  pub fn for_kind(&self, kind: ExerciseKind) -> &str {
    match kind {
      ExerciseKind::Flashcard => &self.flashcard,
      ExerciseKind::Cloze => &self.cloze,
      ExerciseKind::SentenceReorder => &self.sentence_reorder,
      ExerciseKind::MultipleChoice => &self.multiple_choice,
      ExerciseKind::Dictation => &self.dictation,
      ExerciseKind::ListeningQuiz => &self.listening_quiz,
      ExerciseKind::PictureDescription => &self.picture_description,
      ExerciseKind::Pronunciation => &self.pronunciation,
    }
  }
}

impl GraderConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str::<GraderConfig>(s)
  }
}

/// Attempt to load `GraderConfig` from GRADER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_grader_config_from_env() -> Option<GraderConfig> {
  let path = std::env::var("GRADER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match GraderConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "lingua_grader", %path, exercises = cfg.exercises.len(), "Loaded grader config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "lingua_grader", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "lingua_grader", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
