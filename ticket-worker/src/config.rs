//! Worker configuration from the environment.
//!
//! - `TICKET_SEQUENCE_OVERFLOW`: `wrap` (default) or `reject`
//! - `RUST_LOG`: tracing filter, default `warn`; logs go to stderr

use ticket_code::SequenceOverflow;
use tracing_subscriber::EnvFilter;

pub const SEQUENCE_OVERFLOW_VAR: &str = "TICKET_SEQUENCE_OVERFLOW";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerConfig {
    pub sequence_overflow: SequenceOverflow,
}

impl WorkerConfig {
    /// Load from process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sequence_overflow = match lookup(SEQUENCE_OVERFLOW_VAR) {
            Some(value) if !value.trim().is_empty() => value
                .parse()
                .map_err(|e| format!("Invalid {}: {}", SEQUENCE_OVERFLOW_VAR, e))?,
            _ => SequenceOverflow::default(),
        };

        Ok(Self { sequence_overflow })
    }
}

/// Install the stderr tracing subscriber. Safe to call more than once.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
