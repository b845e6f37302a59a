//! # Grading engine
//!
//! Given an exercise id and a learner answer, produce a [`Verdict`](crate::domain::Verdict): a 0–100
//! score, a pass flag from the per-kind threshold table, coaching text from an
//! external generator and optional structured detail.
//!
//! - [`dispatcher::AnswerValidator`] loads the exercise and picks a strategy.
//! - [`strategies`] hold one grading algorithm per exercise kind.
//! - [`facade::ValidationFacade`] wraps the verdict for chat or daily-task callers.
//!
//! Storage and text generation are reached only through the traits in
//! [`store`] and [`generator`].

pub mod answer;
pub mod dispatcher;
pub mod error;
pub mod facade;
pub mod generator;
pub mod helpers;
pub mod payload;
pub mod similarity;
pub mod store;
pub mod strategies;
pub mod thresholds;

pub use dispatcher::AnswerValidator;
pub use error::ValidationError;
pub use facade::{ValidationEnvelope, ValidationFacade, ValidationMode, ValidationRequest};
pub use generator::{DisabledGenerator, TextGenerator};
pub use store::Transcription;
pub use thresholds::ThresholdTable;
