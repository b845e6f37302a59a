//! Typed exercise payloads. Each one is decoded from the raw JSON stored on the
//! exercise and must pass its shape predicate before a strategy grades against it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ExerciseKind;

pub trait ExercisePayload: DeserializeOwned {
  const KIND: ExerciseKind;

  /// Structural rules serde alone cannot express (non-empty lists and the like).
  fn is_well_formed(&self) -> bool {
    true
  }

  /// Decode and check `raw`; `None` means the payload is malformed for this kind.
  fn from_raw(raw: &Value) -> Option<Self> {
    serde_json::from_value::<Self>(raw.clone())
      .ok()
      .filter(|p| p.is_well_formed())
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardCard {
  pub word: String,
  pub definition: String,
  pub example_sentence: String,
  #[serde(default)] pub image_url: Option<String>,
  #[serde(default)] pub audio_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlashcardPayload {
  pub cards: Vec<FlashcardCard>,
}

impl ExercisePayload for FlashcardPayload {
  const KIND: ExerciseKind = ExerciseKind::Flashcard;
  fn is_well_formed(&self) -> bool {
    !self.cards.is_empty()
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClozeSentence {
  pub text: String,
  pub answers: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClozePayload {
  pub sentences: Vec<ClozeSentence>,
}

impl ExercisePayload for ClozePayload {
  const KIND: ExerciseKind = ExerciseKind::Cloze;
  fn is_well_formed(&self) -> bool {
    !self.sentences.is_empty()
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentenceReorderPayload {
  pub fragments: Vec<String>,
}

impl ExercisePayload for SentenceReorderPayload {
  const KIND: ExerciseKind = ExerciseKind::SentenceReorder;
  fn is_well_formed(&self) -> bool {
    !self.fragments.is_empty()
  }
}

/// Multiple-choice option. Older exercises flag the right option with `correct`,
/// newer ones with `isCorrect`; either one is honoured.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChoiceOption {
  pub answer: String,
  #[serde(default, rename = "isCorrect")]
  pub is_correct: Option<bool>,
  #[serde(default)]
  pub correct: Option<bool>,
}

impl ChoiceOption {
  pub fn flagged_correct(&self) -> bool {
    self.is_correct == Some(true) || self.correct == Some(true)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChoiceQuestion {
  pub question: String,
  pub options: Vec<ChoiceOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultipleChoicePayload {
  pub questions: Vec<ChoiceQuestion>,
}

impl ExercisePayload for MultipleChoicePayload {
  const KIND: ExerciseKind = ExerciseKind::MultipleChoice;
  fn is_well_formed(&self) -> bool {
    !self.questions.is_empty()
      && self.questions.iter().all(|q| {
        !q.options.is_empty()
          && q.options.iter().all(|o| o.is_correct.is_some() || o.correct.is_some())
      })
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictationPayload {
  pub transcript: String,
  #[serde(default)] pub audio_url: Option<String>,
}

impl ExercisePayload for DictationPayload {
  const KIND: ExerciseKind = ExerciseKind::Dictation;
  fn is_well_formed(&self) -> bool {
    !self.transcript.trim().is_empty()
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListeningOption {
  pub answer: String,
  pub correct: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningQuestion {
  #[serde(default)] pub audio_url: Option<String>,
  pub question: String,
  pub options: Vec<ListeningOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListeningQuizPayload {
  pub questions: Vec<ListeningQuestion>,
}

impl ExercisePayload for ListeningQuizPayload {
  const KIND: ExerciseKind = ExerciseKind::ListeningQuiz;
  fn is_well_formed(&self) -> bool {
    !self.questions.is_empty() && self.questions.iter().all(|q| !q.options.is_empty())
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationPayload {
  pub text: String,
  #[serde(default)] pub audio_url: Option<String>,
}

impl ExercisePayload for PronunciationPayload {
  const KIND: ExerciseKind = ExerciseKind::Pronunciation;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureDescriptionPayload {
  pub prompt: String,
  #[serde(default)] pub image_url: Option<String>,
  #[serde(default)] pub expected_keywords: Vec<String>,
}

impl ExercisePayload for PictureDescriptionPayload {
  const KIND: ExerciseKind = ExerciseKind::PictureDescription;
}
