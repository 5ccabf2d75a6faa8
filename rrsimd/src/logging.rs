//! Structured logging setup
//!
//! Scheduling decisions are emitted as `tracing` events by the core. This
//! module installs the subscriber that prints them. Everything goes to
//! stderr so presenter output on stdout stays clean.
//!
//! Level resolution order:
//! - `--log-level` (an `EnvFilter` directive such as `debug` or
//!   `sim_scheduler=trace`)
//! - `RUST_LOG`
//! - `warn`

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_DIRECTIVE: &str = "warn";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter {directive:?}: {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("Logging already initialised: {0}")]
    AlreadyInitialised(String),
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Explicit filter directive, overriding `RUST_LOG`
    pub level: Option<String>,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl LogConfig {
    /// Builds the filter this configuration selects
    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match &self.level {
            Some(directive) => {
                EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
                    directive: directive.clone(),
                    message: e.to_string(),
                })
            }
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))),
        }
    }
}

/// Installs the global subscriber
///
/// Fails if a subscriber is already installed (for example by a test
/// harness), leaving the existing one in place.
pub fn init_tracing(config: &LogConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(config.env_filter()?);

    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| LoggingError::AlreadyInitialised(e.to_string()))?;
    debug!(json = config.json, "tracing initialised");
    Ok(())
}
