//! Validated configuration for the circuit breaker.

use super::types::FailureAccounting;
use failguard_core::{
    ConfigError, DEFAULT_BREAKER_NAME, DEFAULT_FAILURE_THRESHOLD, DEFAULT_HALF_OPEN_MAX_INFLIGHT,
    DEFAULT_OPEN_DELAY, DEFAULT_SUCCESS_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for circuit breaker behavior.
///
/// Only obtainable through [`CircuitBreakerConfigBuilder::build`],
/// `TryFrom<CircuitBreakerSettings>` or `Default`, so every instance is valid.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    name: String,
    failure_threshold: usize,
    success_threshold: usize,
    open_delay: Duration,
    half_open_max_inflight: usize,
    recover: bool,
    accounting: FailureAccounting,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BREAKER_NAME.to_string(),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            open_delay: DEFAULT_OPEN_DELAY,
            half_open_max_inflight: DEFAULT_HALF_OPEN_MAX_INFLIGHT,
            recover: false,
            accounting: FailureAccounting::Consecutive,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn builder() -> CircuitBreakerConfigBuilder {
        CircuitBreakerConfigBuilder::default()
    }

    /// Label used in log fields
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Failures required to open the circuit
    pub fn failure_threshold(&self) -> usize {
        self.failure_threshold
    }

    /// Consecutive successful probes required to close the circuit
    pub fn success_threshold(&self) -> usize {
        self.success_threshold
    }

    /// Time spent open before a probe is admitted
    pub fn open_delay(&self) -> Duration {
        self.open_delay
    }

    pub fn half_open_max_inflight(&self) -> usize {
        self.half_open_max_inflight
    }

    /// Whether panicking jobs are captured and counted as failures
    pub fn recover(&self) -> bool {
        self.recover
    }

    pub fn accounting(&self) -> FailureAccounting {
        self.accounting
    }
}

/// Builder for [`CircuitBreakerConfig`]; validation happens in `build`.
#[derive(Debug, Clone, Default)]
pub struct CircuitBreakerConfigBuilder {
    config: CircuitBreakerConfig,
}

impl CircuitBreakerConfigBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn failure_threshold(mut self, threshold: usize) -> Self {
        self.config.failure_threshold = threshold;
        self
    }

    pub fn success_threshold(mut self, threshold: usize) -> Self {
        self.config.success_threshold = threshold;
        self
    }

    pub fn open_delay(mut self, delay: Duration) -> Self {
        self.config.open_delay = delay;
        self
    }

    /// Capture panics inside jobs and count them as failures
    pub fn open_on_panic(mut self) -> Self {
        self.config.recover = true;
        self
    }

    pub fn half_open_max_inflight(mut self, max: usize) -> Self {
        self.config.half_open_max_inflight = max;
        self
    }

    /// Count closed-state failures over the last `capacity` outcomes instead
    /// of consecutively
    pub fn sliding_window(mut self, capacity: usize) -> Self {
        self.config.accounting = FailureAccounting::Windowed { capacity };
        self
    }

    pub fn build(self) -> Result<CircuitBreakerConfig, ConfigError> {
        let config = self.config;
        ensure_positive("failure threshold", config.failure_threshold)?;
        ensure_positive("success threshold", config.success_threshold)?;
        ensure_positive("half-open max inflight", config.half_open_max_inflight)?;

        if let FailureAccounting::Windowed { capacity } = config.accounting {
            ensure_positive("window capacity", capacity)?;
            if capacity < config.failure_threshold {
                return Err(ConfigError::WindowTooSmall {
                    capacity,
                    name: "failure threshold",
                    threshold: config.failure_threshold,
                });
            }
        }

        Ok(config)
    }
}

fn ensure_positive(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value < 1 {
        return Err(ConfigError::invalid_threshold(name, value as i64));
    }
    Ok(())
}

/// Serializable breaker settings, e.g. loaded from a JSON config file.
///
/// Signed fields so that negative values can be reported instead of failing
/// to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitBreakerSettings {
    pub name: Option<String>,
    pub failure_threshold: i64,
    pub success_threshold: i64,
    pub open_delay_ms: i64,
    pub open_on_panic: bool,
    pub half_open_max_inflight: i64,
    /// Enables windowed accounting with this many slots
    pub window_capacity: Option<i64>,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            name: None,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD as i64,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD as i64,
            open_delay_ms: DEFAULT_OPEN_DELAY.as_millis() as i64,
            open_on_panic: false,
            half_open_max_inflight: DEFAULT_HALF_OPEN_MAX_INFLIGHT as i64,
            window_capacity: None,
        }
    }
}

impl CircuitBreakerSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<CircuitBreakerSettings> for CircuitBreakerConfig {
    type Error = ConfigError;

    fn try_from(settings: CircuitBreakerSettings) -> Result<Self, Self::Error> {
        let mut builder = CircuitBreakerConfig::builder()
            .failure_threshold(count("failure threshold", settings.failure_threshold)?)
            .success_threshold(count("success threshold", settings.success_threshold)?)
            .open_delay(millis("open delay", settings.open_delay_ms)?)
            .half_open_max_inflight(count(
                "half-open max inflight",
                settings.half_open_max_inflight,
            )?);

        if let Some(name) = settings.name {
            builder = builder.name(name);
        }
        if settings.open_on_panic {
            builder = builder.open_on_panic();
        }
        if let Some(capacity) = settings.window_capacity {
            builder = builder.sliding_window(count("window capacity", capacity)?);
        }

        builder.build()
    }
}

pub(crate) fn count(name: &'static str, value: i64) -> Result<usize, ConfigError> {
    if value < 1 {
        return Err(ConfigError::invalid_threshold(name, value));
    }
    usize::try_from(value)
        .map_err(|_| ConfigError::invalid_settings(format!("{name} is too large: {value}")))
}

pub(crate) fn millis(name: &'static str, value: i64) -> Result<Duration, ConfigError> {
    if value < 0 {
        return Err(ConfigError::negative_duration(name, value));
    }
    Ok(Duration::from_millis(value as u64))
}
