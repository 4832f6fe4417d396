//! Diagnostic logging using **tracing**.
//!
//! All log output goes to stderr so stdout carries only the report.
//! `RUST_LOG` overrides the default `warn` filter
//! (e.g. `RUST_LOG=deadsym_core=debug`).

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines, for reviewing diagnostics by eye.
    #[default]
    Plain,
    /// Structured JSON, one event per line.
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initializes the global tracing subscriber.
///
/// This should be called *once* at the beginning of the application's runtime.
/// A second call is a no-op.
pub fn init_structured_logging(format: LogFormat) {
    let result = match format {
        LogFormat::Plain => tracing_subscriber::fmt()
            .with_target(false)
            .without_time()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_level(true)
            .with_target(true)
            .with_current_span(true)
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init(),
    };
    // Already initialized (tests, embedding callers): keep the existing one.
    let _ = result;
}
