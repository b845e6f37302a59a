//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - LOG_LEVEL holds EnvFilter directives; unset or invalid falls back to
//!   [`DEFAULT_FILTER`].
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Targets are printed so engine (`grading`) and service (`lingua_grader`)
//! events are easy to tell apart. Tower HTTP TraceLayer adds per-request spans.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,grading=debug,lingua_grader=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl LogFormat {
  pub fn parse(raw: Option<&str>) -> Self {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
      Some("json") => LogFormat::Json,
      _ => LogFormat::Pretty,
    }
  }
}

pub fn init_tracing() {
  let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(true)
    .with_file(true)
    .with_line_number(true);

  // A subscriber may already be installed (tests, embedding); keep it.
  let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());
  let _ = match format {
    LogFormat::Json => builder.json().try_init(),
    LogFormat::Pretty => builder.try_init(),
  };
}
