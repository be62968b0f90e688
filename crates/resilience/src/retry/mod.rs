//! Retry executor re-invoking a job under a continuation predicate.
//!
//! - [`config`] - validated configuration, its builder and serde settings
//! - [`predicate`] - the `RetryPredicate` contract and its default
//! - [`executor`] - the retry loop
//!
//! `max_retries` counts re-attempts after the first call: `retries(2)` runs
//! the job at most three times with two sleeps in between.
//!
//! ```rust,no_run
//! use failguard_resilience::retry::{RetryConfig, RetryExecutor};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RetryConfig::builder()
//!     .delay(Duration::from_millis(100))
//!     .retries(15)
//!     .build()?;
//! let retry = RetryExecutor::new(config);
//!
//! retry.run(|| async { Ok::<_, std::io::Error>(()) }).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod executor;
pub mod predicate;

pub use config::{RetryConfig, RetryConfigBuilder, RetrySettings};
pub use executor::RetryExecutor;
pub use predicate::{RetryOnError, RetryPredicate};
