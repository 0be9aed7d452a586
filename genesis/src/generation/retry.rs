//! Retry and timeout policy wrappers for generation gateways.
//!
//! The orchestrator itself never retries; resilience is layered around the
//! gateway so callers can choose their own policy.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

use super::{GenerationGateway, SessionKey};
use crate::core::StageRole;
use crate::errors::GenerationError;

/// Backoff strategy for retry delays.
#[derive(Debug, Clone, Copy)]
pub enum BackoffStrategy {
    /// Constant delay between retries.
    Constant(Duration),
    /// Linear increase: delay * attempt.
    Linear(Duration),
    /// Exponential: delay * 2^(attempt - 1).
    Exponential(Duration),
}

impl BackoffStrategy {
    /// Calculates the delay for a given attempt (1-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Constant(d) => *d,
            Self::Linear(d) => *d * attempt,
            Self::Exponential(d) => *d * 2u32.saturating_pow(attempt.saturating_sub(1)),
        }
    }
}

/// Jitter strategy for spreading retry delays.
#[derive(Debug, Clone, Copy)]
pub enum JitterStrategy {
    /// No jitter.
    None,
    /// Full jitter: [0, delay].
    Full,
    /// Equal jitter: [delay/2, delay].
    Equal,
}

impl JitterStrategy {
    /// Applies jitter to a delay.
    #[must_use]
    pub fn apply(&self, delay: Duration) -> Duration {
        let mut rng = rand::thread_rng();

        match self {
            Self::None => delay,
            Self::Full => {
                let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                Duration::from_millis(rng.gen_range(0..=millis))
            }
            Self::Equal => {
                let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                let half = millis / 2;
                Duration::from_millis(half + rng.gen_range(0..=half.max(1)))
            }
        }
    }
}

/// Configuration for retry and timeout behavior.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Total attempts, including the first (minimum 1).
    pub max_attempts: u32,
    /// Backoff strategy between attempts.
    pub backoff: BackoffStrategy,
    /// Jitter applied to each delay.
    pub jitter: JitterStrategy,
    /// Per-call timeout; `None` disables the bound.
    pub timeout: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::Exponential(Duration::from_millis(500)),
            jitter: JitterStrategy::Full,
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// A gateway wrapper that bounds each call and retries failures.
///
/// Wraps any [`GenerationGateway`]; the orchestrator stays unaware of the
/// policy. A call that exceeds the configured timeout fails like any other
/// backend error.
pub struct RetryingGateway<G> {
    inner: G,
    config: RetryConfig,
}

impl<G> RetryingGateway<G> {
    /// Wraps a gateway with the given policy.
    #[must_use]
    pub fn new(inner: G, mut config: RetryConfig) -> Self {
        config.max_attempts = config.max_attempts.max(1);
        Self { inner, config }
    }

    /// Wraps a gateway with a constant-delay policy and no timeout.
    #[must_use]
    pub fn constant(inner: G, max_attempts: u32, delay: Duration) -> Self {
        Self::new(
            inner,
            RetryConfig {
                max_attempts,
                backoff: BackoffStrategy::Constant(delay),
                jitter: JitterStrategy::None,
                timeout: None,
            },
        )
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl<G: GenerationGateway> RetryingGateway<G> {
    async fn attempt(
        &self,
        role: StageRole,
        session: &SessionKey,
        context: &str,
    ) -> Result<String, GenerationError> {
        match self.config.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.inner.generate(role, session, context)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(GenerationError::new(format!(
                        "generation timed out after {}ms",
                        limit.as_millis()
                    ))),
                }
            }
            None => self.inner.generate(role, session, context).await,
        }
    }
}

#[async_trait]
impl<G: GenerationGateway> GenerationGateway for RetryingGateway<G> {
    async fn generate(
        &self,
        role: StageRole,
        session: &SessionKey,
        context: &str,
    ) -> Result<String, GenerationError> {
        let mut last_error = GenerationError::new("generation never attempted");

        for attempt in 1..=self.config.max_attempts {
            match self.attempt(role, session, context).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    if attempt < self.config.max_attempts {
                        let delay = self.config.jitter.apply(self.config.backoff.delay(attempt));
                        warn!(
                            %role,
                            attempt,
                            max_attempts = self.config.max_attempts,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            error = %err,
                            "generation attempt failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = err;
                }
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mocks::{FlakyGateway, SlowGateway, StubGateway};
    use uuid::Uuid;

    fn key(role: StageRole) -> SessionKey {
        SessionKey::new(Uuid::new_v4(), role, Uuid::new_v4())
    }

    #[test]
    fn test_constant_backoff() {
        let strategy = BackoffStrategy::Constant(Duration::from_secs(1));
        assert_eq!(strategy.delay(1), Duration::from_secs(1));
        assert_eq!(strategy.delay(5), Duration::from_secs(1));
    }

    #[test]
    fn test_linear_backoff() {
        let strategy = BackoffStrategy::Linear(Duration::from_secs(1));
        assert_eq!(strategy.delay(1), Duration::from_secs(1));
        assert_eq!(strategy.delay(3), Duration::from_secs(3));
    }

    #[test]
    fn test_exponential_backoff() {
        let strategy = BackoffStrategy::Exponential(Duration::from_secs(1));
        assert_eq!(strategy.delay(1), Duration::from_secs(1));
        assert_eq!(strategy.delay(2), Duration::from_secs(2));
        assert_eq!(strategy.delay(3), Duration::from_secs(4));
    }

    #[test]
    fn test_full_jitter_bounds() {
        let jitter = JitterStrategy::Full;
        let delay = Duration::from_secs(10);

        for _ in 0..100 {
            assert!(jitter.apply(delay) <= delay);
        }
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let gateway = RetryingGateway::constant(StubGateway::new(), 3, Duration::from_millis(1));
        let text = gateway
            .generate(StageRole::Pm, &key(StageRole::Pm), "Project Brief: x")
            .await
            .unwrap();
        assert!(!text.is_empty());
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let gateway = RetryingGateway::constant(
            FlakyGateway::failing_times(2),
            3,
            Duration::from_millis(1),
        );
        let result = gateway
            .generate(StageRole::Ba, &key(StageRole::Ba), "ctx")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let flaky = FlakyGateway::failing_times(5);
        let gateway = RetryingGateway::constant(flaky, 3, Duration::from_millis(1));
        let err = gateway
            .generate(StageRole::Ba, &key(StageRole::Ba), "ctx")
            .await
            .unwrap_err();
        assert!(err.message.contains("transient"));
    }

    #[tokio::test]
    async fn test_timeout_becomes_generation_error() {
        let slow = SlowGateway::new(Duration::from_secs(5));
        let gateway = RetryingGateway::new(
            slow,
            RetryConfig {
                max_attempts: 1,
                backoff: BackoffStrategy::Constant(Duration::from_millis(1)),
                jitter: JitterStrategy::None,
                timeout: Some(Duration::from_millis(20)),
            },
        );

        let err = gateway
            .generate(StageRole::Ui, &key(StageRole::Ui), "ctx")
            .await
            .unwrap_err();
        assert!(err.message.contains("timed out"));
    }
}
