//! Core types and enums for circuit breaker functionality.

use std::fmt;
use std::time::Instant;

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitState {
    /// Circuit is closed - jobs run normally
    Closed,
    /// Circuit is open - jobs are rejected without running
    Open,
    /// Circuit is half-open - a limited number of probes test recovery
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "CLOSED",
            CircuitState::Open => "OPEN",
            CircuitState::HalfOpen => "HALF-OPEN",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How closed-state failures are counted towards the failure threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureAccounting {
    /// Consecutive failures; any success resets the count
    #[default]
    Consecutive,
    /// Failures among the most recent `capacity` outcomes
    Windowed { capacity: usize },
}

/// Point-in-time snapshot of a circuit breaker
#[derive(Debug, Clone)]
pub struct CircuitBreakerStats {
    pub state: CircuitState,
    /// Consecutive failures, or failures in the window for windowed accounting
    pub failure_count: usize,
    /// Consecutive successful probes while half-open
    pub success_count: usize,
    /// Jobs currently executing, in any state
    pub inflight: usize,
    /// Probes currently executing while half-open
    pub probes_inflight: usize,
    pub opened_at: Option<Instant>,
    pub last_state_change: Instant,
}
