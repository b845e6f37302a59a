//! Learner answers. The raw value arrives as untyped JSON; each answer shape
//! below has a checking constructor (`TryFrom<&Value>`) that a strategy runs
//! before grading. A failed check is reported back as a score-0 verdict.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerShapeError {
  #[error("Answer must be an array of strings")]
  ExpectedTextList,
  #[error("Answer must be an array of option indices")]
  ExpectedOptionIndices,
  #[error("Answer must be a string")]
  ExpectedText,
  #[error("Answer must be a transcript string or an object with transcript and confidence")]
  ExpectedSpeech,
}

/// Ordered list of short texts (cloze blanks, reordered fragments).
/// `null` entries count as empty blanks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextList(pub Vec<String>);

impl TryFrom<&Value> for TextList {
  type Error = AnswerShapeError;

  fn try_from(raw: &Value) -> Result<Self, Self::Error> {
    let items = raw.as_array().ok_or(AnswerShapeError::ExpectedTextList)?;
    items
      .iter()
      .map(|v| match v {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        _ => Err(AnswerShapeError::ExpectedTextList),
      })
      .collect::<Result<Vec<_>, _>>()
      .map(TextList)
  }
}

/// Selected option index per question; `None` for a skipped question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionSelection(pub Vec<Option<usize>>);

impl OptionSelection {
  pub fn selected(&self, question: usize) -> Option<usize> {
    self.0.get(question).copied().flatten()
  }
}

impl TryFrom<&Value> for OptionSelection {
  type Error = AnswerShapeError;

  fn try_from(raw: &Value) -> Result<Self, Self::Error> {
    let items = raw.as_array().ok_or(AnswerShapeError::ExpectedOptionIndices)?;
    items
      .iter()
      .map(|v| match v {
        Value::Null => Ok(None),
        other => other
          .as_u64()
          .map(|i| Some(i as usize))
          .ok_or(AnswerShapeError::ExpectedOptionIndices),
      })
      .collect::<Result<Vec<_>, _>>()
      .map(OptionSelection)
  }
}

/// Free text (dictation, picture description). `null` is an empty answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreeText(pub String);

impl TryFrom<&Value> for FreeText {
  type Error = AnswerShapeError;

  fn try_from(raw: &Value) -> Result<Self, Self::Error> {
    match raw {
      Value::String(s) => Ok(FreeText(s.clone())),
      Value::Null => Ok(FreeText(String::new())),
      _ => Err(AnswerShapeError::ExpectedText),
    }
  }
}

/// Spoken answer: an ASR transcript with an optional recognizer confidence in `0..=1`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpokenAnswer {
  pub transcript: Option<String>,
  pub confidence: Option<f64>,
}

impl SpokenAnswer {
  /// Transcript if it holds anything besides whitespace.
  pub fn usable_transcript(&self) -> Option<&str> {
    self.transcript.as_deref().filter(|t| !t.trim().is_empty())
  }
}

impl TryFrom<&Value> for SpokenAnswer {
  type Error = AnswerShapeError;

  fn try_from(raw: &Value) -> Result<Self, Self::Error> {
    match raw {
      Value::Null => Ok(SpokenAnswer::default()),
      Value::String(s) => Ok(SpokenAnswer { transcript: Some(s.clone()), confidence: None }),
      Value::Object(map) => {
        let transcript = match map.get("transcript") {
          None | Some(Value::Null) => None,
          Some(Value::String(s)) => Some(s.clone()),
          Some(_) => return Err(AnswerShapeError::ExpectedSpeech),
        };
        let confidence = match map.get("confidence") {
          None | Some(Value::Null) => None,
          Some(v) => Some(v.as_f64().ok_or(AnswerShapeError::ExpectedSpeech)?),
        };
        Ok(SpokenAnswer { transcript, confidence })
      }
      _ => Err(AnswerShapeError::ExpectedSpeech),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn text_list_accepts_strings_and_nulls_only() {
    assert_eq!(
      TextList::try_from(&json!(["кітап", null])).unwrap(),
      TextList(vec!["кітап".into(), String::new()])
    );
    assert_eq!(TextList::try_from(&json!("кітап")), Err(AnswerShapeError::ExpectedTextList));
    assert_eq!(TextList::try_from(&json!(["a", 1])), Err(AnswerShapeError::ExpectedTextList));
  }

  #[test]
  fn option_selection_rejects_negative_and_text_indices() {
    let sel = OptionSelection::try_from(&json!([1, null])).unwrap();
    assert_eq!(sel.selected(0), Some(1));
    assert_eq!(sel.selected(1), None);
    assert_eq!(sel.selected(5), None);
    assert!(OptionSelection::try_from(&json!([-1])).is_err());
    assert!(OptionSelection::try_from(&json!(["0"])).is_err());
    assert!(OptionSelection::try_from(&json!({ "0": 1 })).is_err());
  }

  #[test]
  fn spoken_answer_from_string_or_object() {
    let s = SpokenAnswer::try_from(&json!("сәлем")).unwrap();
    assert_eq!(s.usable_transcript(), Some("сәлем"));

    let o = SpokenAnswer::try_from(&json!({ "transcript": "  ", "confidence": 0.4, "audioUrl": "x" })).unwrap();
    assert_eq!(o.usable_transcript(), None);
    assert_eq!(o.confidence, Some(0.4));

    assert!(SpokenAnswer::try_from(&json!([1, 2])).is_err());
    assert!(SpokenAnswer::try_from(&json!({ "confidence": "high" })).is_err());
  }
}
