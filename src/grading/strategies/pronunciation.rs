//! Pronunciation, graded from a speech-recognition transcript.
//!
//! Reference and transcript are folded the same way (NFKC, lowercase,
//! punctuation and symbols dropped, whitespace collapsed) and compared as word
//! sequences. The base score is `(1 - WER) * 100`; when the recognizer reported
//! a confidence it contributes 15% of the final score.

use async_trait::async_trait;
use serde_json::{json, Value};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::{invalid_payload, ValidationStrategy};
use crate::domain::{DetailedFeedback, ExerciseKind, Verdict};
use crate::grading::answer::SpokenAnswer;
use crate::grading::helpers::StrategyHelpers;
use crate::grading::payload::{ExercisePayload, PronunciationPayload};
use crate::grading::similarity::{word_diff, word_error_rate};

pub const NO_TRANSCRIPT: &str = "No transcript available for this pronunciation attempt";

const RECOGNITION_WEIGHT: f64 = 0.85;
const CONFIDENCE_WEIGHT: f64 = 0.15;

pub struct PronunciationStrategy;

/// Fold text into comparable words.
pub fn spoken_words(s: &str) -> Vec<String> {
  let folded: String = s
    .nfkc()
    .flat_map(char::to_lowercase)
    .map(|c| if c.is_alphanumeric() || is_combining_mark(c) { c } else { ' ' })
    .collect();
  folded.split_whitespace().map(str::to_string).collect()
}

/// Deterministic score from folded word sequences and optional confidence.
pub fn pronunciation_score(target: &[String], said: &[String], confidence: Option<f64>) -> u8 {
  let wer = word_error_rate(said, target);
  let mut score = ((1.0 - wer) * 100.0).round().max(0.0);
  if let Some(c) = confidence.filter(|c| c.is_finite()) {
    score = (score * RECOGNITION_WEIGHT + c.clamp(0.0, 1.0) * 100.0 * CONFIDENCE_WEIGHT).round();
  }
  score.clamp(0.0, 100.0) as u8
}

impl PronunciationPayload {
  fn has_reference(&self) -> bool {
    !spoken_words(&self.text).is_empty()
  }
}

#[async_trait]
impl ValidationStrategy for PronunciationStrategy {
  fn kind(&self) -> ExerciseKind {
    ExerciseKind::Pronunciation
  }

  async fn validate(&self, payload: &Value, answer: &Value, helpers: &StrategyHelpers) -> Verdict {
    let Some(payload) = PronunciationPayload::from_raw(payload).filter(|p| p.has_reference()) else {
      return invalid_payload(PronunciationPayload::KIND);
    };
    let spoken = match SpokenAnswer::try_from(answer) {
      Ok(s) => s,
      Err(e) => return Verdict::rejected(e.to_string()),
    };

    let mut confidence = spoken.confidence;
    let transcript = match spoken.usable_transcript() {
      Some(t) => t.to_string(),
      None => {
        let stored = helpers.latest_transcription().await;
        match stored.and_then(|s| s.transcript.filter(|t| !t.trim().is_empty()).map(|t| (t, s.confidence))) {
          Some((t, stored_confidence)) => {
            if stored_confidence.is_some() {
              confidence = stored_confidence;
            }
            t
          }
          None => return Verdict::rejected(NO_TRANSCRIPT),
        }
      }
    };

    let target = spoken_words(&payload.text);
    let said = spoken_words(&transcript);
    let score = pronunciation_score(&target, &said, confidence);

    let ctx = helpers.build_context();
    let feedback = helpers.feedback(&helpers.prompt(self.kind(), &payload.text, &transcript), &ctx).await;

    let diff = word_diff(&target, &said);
    helpers.scored(self.kind(), score, feedback).with_detail(DetailedFeedback {
      correct_answer: Some(json!(payload.text)),
      explanation: (!diff.is_empty()).then_some(diff),
      hints: None,
    })
  }
}
