//! Validated configuration for the retry executor.

use crate::circuit::config::millis;
use failguard_core::{ConfigError, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    delay: Duration,
    max_retries: u32,
    recover: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
            recover: false,
        }
    }
}

impl RetryConfig {
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// Fixed sleep between attempts
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Re-attempts allowed after the first attempt; 0 means a single attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whether panicking jobs are captured and returned as errors
    pub fn recover(&self) -> bool {
        self.recover
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Capture panics inside jobs and hand them to the predicate as errors
    pub fn retry_on_panic(mut self) -> Self {
        self.config.recover = true;
        self
    }

    // Durations and counts are unsigned here; signed input is checked by
    // `RetrySettings`.
    pub fn build(self) -> Result<RetryConfig, ConfigError> {
        Ok(self.config)
    }
}

/// Serializable retry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub delay_ms: i64,
    pub retries: i64,
    pub retry_on_panic: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_RETRY_DELAY.as_millis() as i64,
            retries: i64::from(DEFAULT_MAX_RETRIES),
            retry_on_panic: false,
        }
    }
}

impl RetrySettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<RetrySettings> for RetryConfig {
    type Error = ConfigError;

    fn try_from(settings: RetrySettings) -> Result<Self, Self::Error> {
        if settings.retries < 0 {
            return Err(ConfigError::NegativeRetries {
                value: settings.retries,
            });
        }
        let retries = u32::try_from(settings.retries).map_err(|_| {
            ConfigError::invalid_settings(format!("retries is too large: {}", settings.retries))
        })?;

        let mut builder = RetryConfig::builder()
            .delay(millis("delay", settings.delay_ms)?)
            .retries(retries);
        if settings.retry_on_panic {
            builder = builder.retry_on_panic();
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetryConfig::builder().build().unwrap();
        assert_eq!(config, RetryConfig::default());
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert_eq!(config.max_retries(), 3);
        assert!(!config.recover());
    }

    #[test]
    fn test_builder() {
        let config = RetryConfig::builder()
            .delay(Duration::from_millis(100))
            .retries(15)
            .retry_on_panic()
            .build()
            .unwrap();
        assert_eq!(config.delay(), Duration::from_millis(100));
        assert_eq!(config.max_retries(), 15);
        assert!(config.recover());
    }

    #[test]
    fn test_settings_reject_negative_values() {
        let err = RetryConfig::try_from(RetrySettings {
            retries: -1,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::NegativeRetries { value: -1 });

        let err = RetryConfig::try_from(RetrySettings {
            delay_ms: -1000,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::negative_duration("delay", -1000));
    }

    #[test]
    fn test_settings_from_json() {
        let settings =
            RetrySettings::from_json(r#"{"delay_ms": 100, "retries": 0, "retry_on_panic": true}"#)
                .unwrap();
        let config = RetryConfig::try_from(settings).unwrap();
        assert_eq!(config.delay(), Duration::from_millis(100));
        assert_eq!(config.max_retries(), 0);
        assert!(config.recover());

        assert!(RetrySettings::from_json("{\"retries\": \"many\"}").is_err());
    }
}
