//! State transition logic for circuit breaker.
//!
//! Every method here runs with the breaker's lock held, so a transition and
//! the counter updates that go with it are observed as one step.

use super::config::CircuitBreakerConfig;
use super::metrics::MetricsState;
use super::types::CircuitState;
use std::time::{Duration, Instant};

impl MetricsState {
    fn enter(&mut self, state: CircuitState, now: Instant) {
        self.state = state;
        self.last_state_change = now;
        self.increment_generation();
        self.reset_counters();
    }

    /// Transition to open state
    pub(super) fn transition_to_open(&mut self, config: &CircuitBreakerConfig, now: Instant) {
        if self.state != CircuitState::Open {
            tracing::warn!(
                breaker = config.name(),
                from = %self.state,
                failures = self.failure_count(),
                open_delay = ?config.open_delay(),
                "Circuit breaker opening"
            );
            self.opened_at = Some(now);
            self.enter(CircuitState::Open, now);
        }
    }

    /// Transition to half-open state
    pub(super) fn transition_to_half_open(&mut self, config: &CircuitBreakerConfig, now: Instant) {
        if self.state != CircuitState::HalfOpen {
            tracing::info!(breaker = config.name(), "Circuit breaker entering half-open state");
            self.enter(CircuitState::HalfOpen, now);
        }
    }

    /// Transition to closed state
    pub(super) fn transition_to_closed(&mut self, config: &CircuitBreakerConfig, now: Instant) {
        if self.state != CircuitState::Closed {
            tracing::info!(
                breaker = config.name(),
                probes = self.success_count,
                "Circuit breaker closing"
            );
            self.enter(CircuitState::Closed, now);
        }
    }

    /// Record a successful job and handle state transitions
    pub(super) fn record_success(
        &mut self,
        config: &CircuitBreakerConfig,
        generation: u64,
        now: Instant,
    ) {
        // Admitted before the last transition
        if generation != self.generation {
            return;
        }

        match self.state {
            CircuitState::HalfOpen => {
                self.success_count += 1;
                if self.success_count >= config.success_threshold() {
                    self.transition_to_closed(config, now);
                }
            }
            CircuitState::Closed => self.note_success(),
            CircuitState::Open => {}
        }
    }

    /// Record a failed job and handle state transitions
    pub(super) fn record_failure(
        &mut self,
        config: &CircuitBreakerConfig,
        generation: u64,
        now: Instant,
    ) {
        if generation != self.generation {
            return;
        }

        match self.state {
            CircuitState::Closed => {
                if self.note_failure() >= config.failure_threshold() {
                    self.transition_to_open(config, now);
                }
            }
            // Any failed probe reopens the circuit
            CircuitState::HalfOpen => self.transition_to_open(config, now),
            CircuitState::Open => {}
        }
    }

    /// Move from Open to HalfOpen once the open delay has elapsed
    pub(super) fn check_half_open_transition(
        &mut self,
        config: &CircuitBreakerConfig,
        now: Instant,
    ) -> bool {
        if self.state == CircuitState::Open && self.remaining_open(config, now).is_zero() {
            self.transition_to_half_open(config, now);
            return true;
        }
        false
    }

    /// Time left before an open circuit admits a probe
    pub(super) fn remaining_open(&self, config: &CircuitBreakerConfig, now: Instant) -> Duration {
        match self.opened_at {
            Some(opened_at) => config
                .open_delay()
                .saturating_sub(now.saturating_duration_since(opened_at)),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::types::FailureAccounting;

    fn config(failures: usize, successes: usize, delay: Duration) -> CircuitBreakerConfig {
        CircuitBreakerConfig::builder()
            .failure_threshold(failures)
            .success_threshold(successes)
            .open_delay(delay)
            .build()
            .unwrap()
    }

    #[test]
    fn test_opens_on_exactly_the_threshold_failure() {
        let config = config(3, 1, Duration::from_secs(1));
        let mut metrics = MetricsState::new(FailureAccounting::Consecutive);
        let now = Instant::now();

        metrics.record_failure(&config, 0, now);
        metrics.record_failure(&config, 0, now);
        assert_eq!(metrics.state, CircuitState::Closed);
        metrics.record_failure(&config, 0, now);
        assert_eq!(metrics.state, CircuitState::Open);
        assert_eq!(metrics.opened_at, Some(now));
        assert_eq!(metrics.generation, 1);
    }

    #[test]
    fn test_stale_outcomes_are_ignored() {
        let config = config(1, 1, Duration::from_secs(1));
        let mut metrics = MetricsState::new(FailureAccounting::Consecutive);
        let now = Instant::now();

        metrics.record_failure(&config, 0, now);
        assert_eq!(metrics.state, CircuitState::Open);

        // A job admitted while closed finishes after the circuit opened
        metrics.record_success(&config, 0, now);
        metrics.record_failure(&config, 0, now);
        assert_eq!(metrics.state, CircuitState::Open);
        assert_eq!(metrics.generation, 1);
    }

    #[test]
    fn test_half_open_after_delay() {
        let config = config(1, 1, Duration::from_millis(100));
        let mut metrics = MetricsState::new(FailureAccounting::Consecutive);
        let opened = Instant::now();
        metrics.record_failure(&config, 0, opened);

        assert!(!metrics.check_half_open_transition(&config, opened + Duration::from_millis(50)));
        assert_eq!(
            metrics.remaining_open(&config, opened + Duration::from_millis(50)),
            Duration::from_millis(50)
        );
        assert!(metrics.check_half_open_transition(&config, opened + Duration::from_millis(100)));
        assert_eq!(metrics.state, CircuitState::HalfOpen);
    }

    #[test]
    fn test_probe_failure_reopens_and_restarts_delay() {
        let config = config(1, 2, Duration::ZERO);
        let mut metrics = MetricsState::new(FailureAccounting::Consecutive);
        let first = Instant::now();
        metrics.record_failure(&config, 0, first);
        metrics.check_half_open_transition(&config, first);

        let generation = metrics.generation;
        let later = first + Duration::from_millis(10);
        metrics.record_success(&config, generation, later);
        assert_eq!(metrics.state, CircuitState::HalfOpen);
        metrics.record_failure(&config, generation, later);
        assert_eq!(metrics.state, CircuitState::Open);
        assert_eq!(metrics.opened_at, Some(later));
        assert_eq!(metrics.success_count, 0);
    }

    #[test]
    fn test_windowed_accounting_opens_on_window_count() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(2)
            .sliding_window(3)
            .build()
            .unwrap();
        let mut metrics = MetricsState::new(config.accounting());
        let now = Instant::now();

        metrics.record_failure(&config, 0, now);
        metrics.record_success(&config, 0, now);
        assert_eq!(metrics.state, CircuitState::Closed);
        metrics.record_failure(&config, 0, now);
        assert_eq!(metrics.state, CircuitState::Open);
    }
}
