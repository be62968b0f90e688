//! Core errors and constants for `failguard`.
//!
//! ## Key Components
//!
//! - **`errors`**: the generic `Error<E>` returned by guarded job execution
//!   and the `ConfigError` returned by validated construction.
//! - **`constants`**: default thresholds, delays and retry budgets.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{ConfigError, Error, Result},
};
