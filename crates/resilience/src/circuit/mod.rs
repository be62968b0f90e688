//! Circuit breaker guarding an unreliable dependency.
//!
//! ## Architecture
//!
//! - [`types`] - `CircuitState`, `FailureAccounting` and the stats snapshot
//! - [`config`] - validated configuration, its builder and serde settings
//! - [`metrics`] - counters kept behind the breaker's lock
//! - [`transitions`] - state transition logic
//! - [`state`] - the `CircuitBreaker` itself: admission and execution
//!
//! ## State transitions
//!
//! ```text
//! Closed   -> Open:     failure signal reaches the failure threshold
//! Open     -> HalfOpen: open delay elapsed (checked lazily on the next call)
//! HalfOpen -> Closed:   success threshold consecutive successful probes
//! HalfOpen -> Open:     any failed probe
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use failguard_resilience::circuit::{CircuitBreaker, CircuitBreakerConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CircuitBreakerConfig::builder()
//!     .failure_threshold(3)
//!     .success_threshold(2)
//!     .open_delay(Duration::from_secs(3))
//!     .build()?;
//! let cb = CircuitBreaker::new(config);
//!
//! let value = cb.run(|| async { Ok::<_, std::io::Error>(42) }).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod metrics;
pub mod state;
pub mod transitions;
pub mod types;

pub use config::{CircuitBreakerConfig, CircuitBreakerConfigBuilder, CircuitBreakerSettings};
pub use state::CircuitBreaker;
pub use types::{CircuitBreakerStats, CircuitState, FailureAccounting};
