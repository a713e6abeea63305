//! Retry policy for LLM calls
//!
//! Bounded attempts with exponential backoff between a minimum and a maximum
//! wait. Only transient errors (see [`LlmError::is_transient`]) are retried.

use crate::LlmError;
use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of attempts, including the first one
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default wait before the first retry
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_secs(4);

/// Default cap on any single wait
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(10);

/// A call that failed for good
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed after {attempts} attempt(s): {source}")]
pub struct RetryExhausted {
    /// What was being attempted
    pub operation: String,

    /// Attempts made before giving up
    pub attempts: u32,

    /// The last error seen
    #[source]
    pub source: LlmError,
}

/// Retry policy with exponential backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    min_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` counts the first call
    pub fn new(max_attempts: u32, min_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_backoff,
            max_backoff: max_backoff.max(min_backoff),
            multiplier: 2.0,
        }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Set the growth factor between waits
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier.max(1.0);
        self
    }

    /// Maximum attempts, including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Waits between consecutive attempts, in order
    ///
    /// # Examples
    ///
    /// ```
    /// use kizuna_llm::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(4, Duration::from_secs(4), Duration::from_secs(10));
    /// let waits: Vec<u128> = policy.delays().iter().map(|d| d.as_millis()).collect();
    /// assert_eq!(waits, vec![4000, 8000, 10000]);
    /// ```
    pub fn delays(&self) -> Vec<Duration> {
        let mut schedule = self.schedule();
        (1..self.max_attempts)
            .map(|_| schedule.next_backoff().unwrap_or(self.max_backoff))
            .collect()
    }

    fn schedule(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.min_backoff)
            .with_max_interval(self.max_backoff)
            .with_multiplier(self.multiplier)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(None)
            .build()
    }

    /// Run `call` until it succeeds, fails permanently, or attempts run out
    ///
    /// `operation` only labels log lines and the returned error.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, RetryExhausted>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut schedule = self.schedule();
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(operation, attempt = attempts, "Calling LLM");

            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_transient() || attempts >= self.max_attempts {
                return Err(RetryExhausted {
                    operation: operation.to_string(),
                    attempts,
                    source: error,
                });
            }

            let delay = schedule.next_backoff().unwrap_or(self.max_backoff);
            warn!(
                operation,
                attempt = attempts,
                error = %error,
                retry_in_ms = delay.as_millis() as u64,
                "LLM call failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, waiting between 4 and 10 seconds
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_BACKOFF, DEFAULT_MAX_BACKOFF)
    }
}
