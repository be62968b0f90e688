//! Fault-tolerance primitives for wrapping unreliable jobs.
//!
//! ## Key Components
//!
//! - **`circuit`**: a circuit breaker that stops calling a failing
//!   dependency and probes it again after a delay.
//! - **`retry`**: a retry executor with a fixed delay and a caller-supplied
//!   continuation predicate.
//! - **`window`**: the fixed-capacity outcome window behind windowed failure
//!   accounting.
//! - **`recovery`**: the fault boundary turning a panicking job into an
//!   error.
//!
//! The breaker and the executor know nothing about each other; compose them
//! at the call site, e.g. `retry.run(|| breaker.run(job))`.

pub mod circuit;
pub mod recovery;
pub mod retry;
pub mod window;

pub use circuit::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerSettings, CircuitBreakerStats,
    CircuitState, FailureAccounting,
};
pub use failguard_core::{ConfigError, Error, Result};
pub use recovery::{catch_fault, Fault};
pub use retry::{RetryConfig, RetryExecutor, RetryOnError, RetryPredicate, RetrySettings};
pub use window::{OutcomeRing, SlidingWindow};
