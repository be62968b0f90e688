//! Counters and bookkeeping guarded by the circuit breaker's lock.

use super::types::{CircuitBreakerStats, CircuitState, FailureAccounting};
use crate::window::OutcomeRing;
use std::time::Instant;

/// Closed-state failure signal
#[derive(Debug)]
enum FailureCounter {
    Consecutive(usize),
    /// `true` slots are failures
    Windowed(OutcomeRing),
}

/// Internal state tracking for circuit breaker metrics.
///
/// Always accessed through the breaker's mutex, so state and counters are
/// read and written together.
#[derive(Debug)]
pub struct MetricsState {
    pub(super) state: CircuitState,
    failures: FailureCounter,
    pub(super) success_count: usize,
    pub(super) inflight: usize,
    pub(super) probes_inflight: usize,
    pub(super) generation: u64,
    pub(super) opened_at: Option<Instant>,
    pub(super) last_state_change: Instant,
}

impl MetricsState {
    /// Create new metrics state
    pub fn new(accounting: FailureAccounting) -> Self {
        let failures = match accounting {
            FailureAccounting::Consecutive => FailureCounter::Consecutive(0),
            FailureAccounting::Windowed { capacity } => {
                FailureCounter::Windowed(OutcomeRing::sized(capacity))
            }
        };
        Self {
            state: CircuitState::Closed,
            failures,
            success_count: 0,
            inflight: 0,
            probes_inflight: 0,
            generation: 0,
            opened_at: None,
            last_state_change: Instant::now(),
        }
    }

    /// Current closed-state failure signal
    pub fn failure_count(&self) -> usize {
        match &self.failures {
            FailureCounter::Consecutive(count) => *count,
            FailureCounter::Windowed(ring) => ring.count(),
        }
    }

    /// Count a failure and return the updated failure signal
    pub(super) fn note_failure(&mut self) -> usize {
        match &mut self.failures {
            FailureCounter::Consecutive(count) => {
                *count += 1;
                *count
            }
            FailureCounter::Windowed(ring) => {
                ring.insert(true);
                ring.count()
            }
        }
    }

    pub(super) fn note_success(&mut self) {
        match &mut self.failures {
            FailureCounter::Consecutive(count) => *count = 0,
            FailureCounter::Windowed(ring) => ring.insert(false),
        }
    }

    /// Reset internal counters
    pub fn reset_counters(&mut self) {
        match &mut self.failures {
            FailureCounter::Consecutive(count) => *count = 0,
            FailureCounter::Windowed(ring) => ring.reset(false),
        }
        self.success_count = 0;
        self.probes_inflight = 0;
    }

    /// Increment generation counter for state changes
    pub fn increment_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Get current circuit breaker statistics
    pub fn stats(&self) -> CircuitBreakerStats {
        CircuitBreakerStats {
            state: self.state,
            failure_count: self.failure_count(),
            success_count: self.success_count,
            inflight: self.inflight,
            probes_inflight: self.probes_inflight,
            opened_at: self.opened_at,
            last_state_change: self.last_state_change,
        }
    }
}
