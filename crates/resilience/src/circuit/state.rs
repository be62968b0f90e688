//! Circuit breaker state management and execution logic.

use super::config::CircuitBreakerConfig;
use super::metrics::MetricsState;
use super::types::{CircuitBreakerStats, CircuitState};
use crate::recovery;
use failguard_core::{Error, Result};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::time::Instant;

/// Circuit breaker implementation.
///
/// Share one instance (by reference or `Arc`) between every caller of the
/// dependency it guards. The lock is never held while a job runs.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    metrics: Mutex<MetricsState>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let metrics = Mutex::new(MetricsState::new(config.accounting()));
        Self { config, metrics }
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Get the current state of the circuit
    pub fn state(&self) -> CircuitState {
        let mut metrics = self.metrics.lock();
        metrics.check_half_open_transition(&self.config, Instant::now());
        metrics.state
    }

    /// Get current circuit breaker statistics
    pub fn stats(&self) -> CircuitBreakerStats {
        let mut metrics = self.metrics.lock();
        metrics.check_half_open_transition(&self.config, Instant::now());
        metrics.stats()
    }

    /// Execute a job through the circuit breaker.
    ///
    /// Returns [`Error::CircuitOpen`] or [`Error::ProbeRejected`] without
    /// running the job when the circuit refuses it; otherwise the job's own
    /// outcome, with its error wrapped in [`Error::Inner`].
    pub async fn run<F, Fut, T, E>(&self, job: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let permit = self.admit::<E>()?;
        let outcome = recovery::execute(job, self.config.recover()).await;
        permit.settle(outcome.is_err());
        outcome
    }

    /// Decide whether a job may run, taking an inflight slot if so
    fn admit<E>(&self) -> Result<Permit<'_>, E> {
        let now = Instant::now();
        let mut metrics = self.metrics.lock();
        metrics.check_half_open_transition(&self.config, now);

        match metrics.state {
            CircuitState::Open => {
                let remaining = metrics.remaining_open(&self.config, now);
                tracing::debug!(breaker = self.name(), ?remaining, "Circuit breaker rejected job");
                Err(Error::CircuitOpen { remaining })
            }
            CircuitState::HalfOpen => {
                let max = self.config.half_open_max_inflight();
                if metrics.probes_inflight >= max {
                    tracing::debug!(
                        breaker = self.name(),
                        inflight = metrics.probes_inflight,
                        max,
                        "Circuit breaker rejected probe"
                    );
                    return Err(Error::ProbeRejected {
                        inflight: metrics.probes_inflight,
                        max,
                    });
                }
                metrics.probes_inflight += 1;
                metrics.inflight += 1;
                Ok(Permit::new(self, metrics.generation, true))
            }
            CircuitState::Closed => {
                metrics.inflight += 1;
                Ok(Permit::new(self, metrics.generation, false))
            }
        }
    }
}

impl fmt::Display for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (inflight, state) = {
            let mut metrics = self.metrics.lock();
            metrics.check_half_open_transition(&self.config, Instant::now());
            (metrics.inflight, metrics.state)
        };
        write!(f, "cb{{jobs: {inflight}, state: {state}}}")
    }
}

/// Inflight slot held while an admitted job runs.
///
/// Dropped without [`Permit::settle`] (cancelled future or a panic that was
/// not recovered) it frees the slot and records no outcome.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    probe: bool,
    settled: bool,
}

impl<'a> Permit<'a> {
    fn new(breaker: &'a CircuitBreaker, generation: u64, probe: bool) -> Self {
        Self {
            breaker,
            generation,
            probe,
            settled: false,
        }
    }

    fn settle(mut self, failed: bool) {
        self.settled = true;
        let config = &self.breaker.config;
        let now = Instant::now();
        let mut metrics = self.breaker.metrics.lock();
        self.release(&mut metrics);
        if failed {
            metrics.record_failure(config, self.generation, now);
        } else {
            metrics.record_success(config, self.generation, now);
        }
    }

    fn release(&self, metrics: &mut MetricsState) {
        metrics.inflight = metrics.inflight.saturating_sub(1);
        // Probe slots are reset on every transition
        if self.probe && metrics.generation == self.generation {
            metrics.probes_inflight = metrics.probes_inflight.saturating_sub(1);
        }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let mut metrics = self.breaker.metrics.lock();
            self.release(&mut metrics);
        }
    }
}
