//! Domain models shared by the grading engine and the service layer:
//! exercise kinds, learner languages, exercises and the verdict returned for an answer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The eight exercise shapes the engine knows how to grade.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseKind {
  Flashcard,
  Cloze,
  SentenceReorder,
  MultipleChoice,
  Dictation,
  ListeningQuiz,
  PictureDescription,
  Pronunciation,
}

impl ExerciseKind {
  pub const ALL: [ExerciseKind; 8] = [
    ExerciseKind::Flashcard,
    ExerciseKind::Cloze,
    ExerciseKind::SentenceReorder,
    ExerciseKind::MultipleChoice,
    ExerciseKind::Dictation,
    ExerciseKind::ListeningQuiz,
    ExerciseKind::PictureDescription,
    ExerciseKind::Pronunciation,
  ];

  /// Human label used in learner-facing messages ("Invalid cloze payload").
  pub fn label(self) -> &'static str {
    match self {
      ExerciseKind::Flashcard => "flashcard",
      ExerciseKind::Cloze => "cloze",
      ExerciseKind::SentenceReorder => "sentence reorder",
      ExerciseKind::MultipleChoice => "multiple choice",
      ExerciseKind::Dictation => "dictation",
      ExerciseKind::ListeningQuiz => "listening quiz",
      ExerciseKind::PictureDescription => "picture description",
      ExerciseKind::Pronunciation => "pronunciation",
    }
  }
}

impl fmt::Display for ExerciseKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Language the learner reads feedback in.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
  #[default]
  English,
  Kazakh,
  Russian,
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Language::English => "English",
      Language::Kazakh => "Kazakh",
      Language::Russian => "Russian",
    };
    f.write_str(name)
  }
}

/// Authored exercise as returned by the exercise lookup.
/// `payload` is kept as raw JSON; each strategy checks its own shape before grading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
  pub id: u64,
  #[serde(default)]
  pub title: String,
  pub kind: ExerciseKind,
  pub payload: Value,
}

/// Structured diagnostics attached to a verdict.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetailedFeedback {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub correct_answer: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hints: Option<Vec<String>>,
}

/// Outcome of grading one answer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
  pub is_correct: bool,
  pub score: u8,
  pub feedback: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub detailed_feedback: Option<DetailedFeedback>,
}

impl Verdict {
  /// Score-0 verdict for a submission or payload that failed a shape check.
  pub fn rejected(feedback: impl Into<String>) -> Self {
    Self { is_correct: false, score: 0, feedback: feedback.into(), detailed_feedback: None }
  }

  pub fn with_detail(mut self, detail: DetailedFeedback) -> Self {
    self.detailed_feedback = Some(detail);
    self
  }
}
