//! Application state: attempt log and the validation facade.
//!
//! This module owns:
//!   - the in-memory exercise bank (TOML entries + built-in seeds), behind the facade
//!   - the attempt log that feeds pronunciation history lookups
//!   - the grading engine, wired to OpenAI when configured

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::load_grader_config_from_env;
use crate::grading::{AnswerValidator, DisabledGenerator, TextGenerator, ThresholdTable, ValidationFacade};
use crate::openai::OpenAiGenerator;
use crate::seeds::seed_exercises;
use crate::store::{AttemptLog, ExerciseBank};

#[derive(Clone)]
pub struct AppState {
  pub attempts: AttemptLog,
  pub facade: ValidationFacade,
}

impl AppState {
  /// Build state from env: load config, seed exercises, init OpenAI.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let cfg = load_grader_config_from_env().unwrap_or_default();
    let bank = ExerciseBank::from_sources(&cfg.exercises, seed_exercises());
    let thresholds = ThresholdTable::with_overrides(&cfg.thresholds);

    let generator: Arc<dyn TextGenerator> = match OpenAiGenerator::from_env(&cfg.prompts) {
      Some(oa) => {
        info!(target: "lingua_grader", base_url = %oa.base_url, feedback_model = %oa.feedback_model, "OpenAI enabled.");
        Arc::new(oa)
      }
      None => {
        info!(target: "lingua_grader", "OpenAI disabled (no OPENAI_API_KEY). Feedback falls back to fixed text.");
        Arc::new(DisabledGenerator)
      }
    };

    let attempts = AttemptLog::default();
    let validator = AnswerValidator::new(Arc::new(bank), generator)
      .with_history(Arc::new(attempts.clone()))
      .with_thresholds(thresholds)
      .with_prompts(Arc::new(cfg.prompts));

    Self { attempts, facade: ValidationFacade::new(Arc::new(validator)) }
  }

  /// State over built-in seeds with an explicit generator.
  #[cfg(test)]
  pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
    let bank = ExerciseBank::from_sources(&[], seed_exercises());
    let attempts = AttemptLog::default();
    let validator = AnswerValidator::new(Arc::new(bank), generator).with_history(Arc::new(attempts.clone()));
    Self { attempts, facade: ValidationFacade::new(Arc::new(validator)) }
  }

  /// State around a caller-built validator, with a fresh attempt log.
  #[cfg(test)]
  pub fn with_validator(validator: AnswerValidator) -> Self {
    Self { attempts: AttemptLog::default(), facade: ValidationFacade::new(Arc::new(validator)) }
  }
}
