//! Retry loop with a fixed delay between attempts.

use super::config::RetryConfig;
use super::predicate::{RetryOnError, RetryPredicate};
use crate::recovery;
use failguard_core::{Error, Result};
use std::future::Future;
use tokio::time::sleep;

/// Re-invokes a job while its predicate asks for another attempt.
///
/// Holds no per-call state, so one executor can serve many concurrent
/// callers.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor<P = RetryOnError> {
    config: RetryConfig,
    predicate: P,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            predicate: RetryOnError,
        }
    }
}

impl<P> RetryExecutor<P> {
    /// Replace the continuation predicate
    pub fn retry_if<Q>(self, predicate: Q) -> RetryExecutor<Q> {
        RetryExecutor {
            config: self.config,
            predicate,
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute a job that yields no value, retrying per the predicate
    pub async fn run<F, Fut, E>(&self, job: F) -> Result<(), E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        P: RetryPredicate<(), E>,
    {
        self.get(job).await
    }

    /// Execute a job that yields a value, retrying per the predicate.
    ///
    /// Returns the first outcome the predicate accepts, or
    /// [`Error::RetriesExhausted`] once `max_retries` re-attempts were made.
    pub async fn get<F, Fut, T, E>(&self, mut job: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        P: RetryPredicate<T, E>,
    {
        let max_retries = self.config.max_retries();
        let mut retries = 0u32;

        loop {
            let outcome = recovery::execute(&mut job, self.config.recover()).await;

            if !self.predicate.should_retry(&outcome) {
                if retries > 0 {
                    tracing::debug!(retries, "Job finished after retrying");
                }
                return outcome;
            }

            if retries >= max_retries {
                let attempts = retries.saturating_add(1);
                tracing::warn!(attempts, "Retries exhausted");
                return Err(Error::RetriesExhausted {
                    attempts,
                    last_error: outcome.err().map(Box::new),
                });
            }

            retries += 1;
            tracing::debug!(
                attempt = retries + 1,
                max_attempts = max_retries.saturating_add(1),
                delay = ?self.config.delay(),
                "Retrying job"
            );
            sleep(self.config.delay()).await;
        }
    }
}
