//! Engine configuration.
//!
//! Configuration is deliberately small: how long a generation call may run,
//! how the retry wrapper behaves, and how much event buffering a connection
//! gets. Values come from defaults, a deserialized config document, or
//! `GENESIS_*` environment variables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::WorkflowError;
use crate::generation::{BackoffStrategy, JitterStrategy, RetryConfig};

/// Tunable parameters for the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-generation-call timeout in seconds; 0 disables the bound.
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,
    /// Total generation attempts for the retry wrapper, including the first.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base delay between retry attempts in milliseconds.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Capacity of a connection's event channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

const fn default_stage_timeout_secs() -> u64 {
    120
}

const fn default_retry_attempts() -> u32 {
    3
}

const fn default_retry_base_delay_ms() -> u64 {
    500
}

const fn default_event_capacity() -> usize {
    64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: default_stage_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from `GENESIS_*` environment variables,
    /// falling back to defaults for unset variables.
    ///
    /// Recognized variables: `GENESIS_STAGE_TIMEOUT_SECS`,
    /// `GENESIS_RETRY_ATTEMPTS`, `GENESIS_RETRY_BASE_DELAY_MS`,
    /// `GENESIS_EVENT_CAPACITY`.
    pub fn from_env() -> Result<Self, WorkflowError> {
        let defaults = Self::default();
        Ok(Self {
            stage_timeout_secs: env_or("GENESIS_STAGE_TIMEOUT_SECS", defaults.stage_timeout_secs)?,
            retry_attempts: env_or("GENESIS_RETRY_ATTEMPTS", defaults.retry_attempts)?,
            retry_base_delay_ms: env_or(
                "GENESIS_RETRY_BASE_DELAY_MS",
                defaults.retry_base_delay_ms,
            )?,
            event_capacity: env_or("GENESIS_EVENT_CAPACITY", defaults.event_capacity)?,
        })
    }

    /// The per-call timeout, or `None` when disabled.
    #[must_use]
    pub const fn stage_timeout(&self) -> Option<Duration> {
        match self.stage_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// The retry policy implied by this configuration.
    #[must_use]
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retry_attempts,
            backoff: BackoffStrategy::Exponential(Duration::from_millis(self.retry_base_delay_ms)),
            jitter: JitterStrategy::Full,
            timeout: self.stage_timeout(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, fallback: T) -> Result<T, WorkflowError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| WorkflowError::Validation(format!("invalid value for {name}: {raw}"))),
        Err(std::env::VarError::NotPresent) => Ok(fallback),
        Err(std::env::VarError::NotUnicode(_)) => Err(WorkflowError::Validation(format!(
            "invalid value for {name}"
        ))),
    }
}
