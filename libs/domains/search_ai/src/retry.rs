use core_config::env_parse_or;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{SearchAIError, SearchAIResult};

/// Bounded retry policy for upstream calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Spread delays to 50-100% of their nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 3 attempts, 200ms initial delay doubling up to 5s, jittered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Single attempt, no waiting.
    pub fn disabled() -> Self {
        Self::new().with_max_attempts(1).without_jitter()
    }

    /// Reads `RETRY_MAX_ATTEMPTS`, `RETRY_INITIAL_DELAY_MS` and `RETRY_MAX_DELAY_MS`.
    pub fn from_env() -> SearchAIResult<Self> {
        let defaults = Self::default();
        Ok(Self::new()
            .with_max_attempts(env_parse_or("RETRY_MAX_ATTEMPTS", defaults.max_attempts)?)
            .with_initial_delay(env_parse_or(
                "RETRY_INITIAL_DELAY_MS",
                defaults.initial_delay_ms,
            )?)
            .with_max_delay(env_parse_or("RETRY_MAX_DELAY_MS", defaults.max_delay_ms)?))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retry `operation` with exponential backoff while `should_retry` accepts the error.
///
/// The first error rejected by `should_retry`, or the last error once
/// `max_attempts` is reached, is returned unchanged.
pub async fn retry_if<F, Fut, T, E, P>(
    mut operation: F,
    config: &RetryConfig,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(result);
            }
            Err(e) if !should_retry(&e) => return Err(e),
            Err(e) => {
                if attempt >= config.max_attempts {
                    warn!("Operation failed after {} attempts: {}", attempt, e);
                    return Err(e);
                }

                let current_delay = if config.use_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };

                debug!(
                    "Operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempt, config.max_attempts, e, current_delay
                );

                tokio::time::sleep(Duration::from_millis(current_delay)).await;

                delay =
                    ((delay as f64 * config.backoff_multiplier) as u64).min(config.max_delay_ms);
            }
        }
    }
}

/// Retry only errors flagged [`SearchAIError::is_transient`].
pub async fn retry_transient<F, Fut, T>(operation: F, config: &RetryConfig) -> SearchAIResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SearchAIResult<T>>,
{
    retry_if(operation, config, SearchAIError::is_transient).await
}

/// Random factor between 50% and 100% of `delay`
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}
