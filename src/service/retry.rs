//! Retry logic with exponential backoff for store operations.
//!
//! This module provides the `RetryContext` for executing a store call with bounded retries.
//! Whether a failure is retried is decided by [`Error::to_retry_strategy`]: network and
//! content failures are retried, authentication failures and version conflicts are surfaced
//! on the first occurrence.

use std::{future::Future, time::Duration};

use dioxus_logger::tracing;

use crate::{
    config::RetryConfig,
    error::{retry::ErrorRetryStrategy, Error, StoreError},
};

/// Retry policy for a single store call
#[derive(Debug, Clone, Copy)]
pub struct RetryContext {
    /// Max attempts before failure
    max_attempts: u32,
    /// Backoff after the first failed attempt
    initial_backoff: Duration,
    /// Deadline for each attempt
    attempt_timeout: Duration,
}

impl RetryContext {
    /// Creates a retry context from `config`; at least one attempt is always made.
    pub fn new(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: config.initial_backoff,
            attempt_timeout: config.attempt_timeout,
        }
    }

    /// Execute an operation with automatic retry logic
    ///
    /// The operation is invoked once per attempt and must produce a fresh future each time.
    /// Each attempt is bounded by the attempt timeout; a timed out attempt counts as a transient
    /// network failure. Between attempts the context sleeps `initial_backoff * 2^n` where `n` is
    /// the zero-based index of the attempt that just failed.
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "document fetch")
    /// - `operation`: Async function performing one attempt
    ///
    /// # Returns
    /// - `Ok(R)` - First successful attempt's result
    /// - `Err(Error::RetriesExhausted)` - Every attempt failed with a retryable error
    /// - `Err(Error)` - A non-retryable error, returned unchanged on first occurrence
    pub async fn execute_with_retry<R, F, Fut>(
        &self,
        description: &str,
        mut operation: F,
    ) -> Result<R, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            let result = match tokio::time::timeout(self.attempt_timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::TransientNetwork(format!(
                    "attempt timed out after {:?}",
                    self.attempt_timeout
                ))
                .into()),
            };

            match result {
                Ok(result) => {
                    tracing::debug!("Successfully processed {}", description);
                    return Ok(result);
                }
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::error!("Permanent error for {}: {:?}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.max_attempts,
                                description,
                                e
                            );
                            return Err(Error::RetriesExhausted {
                                attempts: attempt_count,
                                source: Box::new(e),
                            });
                        }

                        let backoff = self
                            .initial_backoff
                            .saturating_mul(2_u32.saturating_pow(attempt_count - 1));

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count + 1,
                            self.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
