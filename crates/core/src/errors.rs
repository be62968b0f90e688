use std::time::Duration;

/// Result type alias for guarded job execution
pub type Result<T, E> = std::result::Result<T, Error<E>>;

/// Errors returned while executing a job through a breaker or retry executor.
///
/// `E` is the job's own error type. Everything except [`Error::Inner`] is
/// produced by the guard itself.
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    /// The job ran and returned its own error
    #[error("{0}")]
    Inner(E),

    /// The breaker is open and the open delay has not elapsed yet
    #[error("circuit breaker is open (probing allowed in {remaining:?})")]
    CircuitOpen { remaining: Duration },

    /// The breaker is half-open and every probe slot is taken
    #[error("exceeded maximum number of inflight probes ({inflight} >= {max})")]
    ProbeRejected { inflight: usize, max: usize },

    /// The job panicked and the panic was captured by the fault boundary
    #[error("recovered from panic in job: {message}")]
    RecoveredFault { message: String },

    /// The retry predicate still asked for another attempt after the last one
    #[error("retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        /// Error of the final attempt, `None` when it returned a value the
        /// predicate rejected
        last_error: Option<Box<Error<E>>>,
    },
}

impl<E> Error<E> {
    /// Create a recovered-fault error
    #[must_use]
    pub fn recovered_fault(message: impl Into<String>) -> Self {
        Error::RecoveredFault {
            message: message.into(),
        }
    }

    /// Whether the job was refused without being executed
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::CircuitOpen { .. } | Error::ProbeRejected { .. })
    }

    /// Borrow the job's own error, if this is one
    pub fn inner(&self) -> Option<&E> {
        match self {
            Error::Inner(e) => Some(e),
            _ => None,
        }
    }

    /// Take the job's own error, if this is one
    pub fn into_inner(self) -> Option<E> {
        match self {
            Error::Inner(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> Error<Error<E>> {
    /// Collapse the nesting produced by retrying a breaker-guarded job.
    ///
    /// `RetryExecutor::run(|| breaker.run(job))` yields `Error<Error<E>>`;
    /// this lifts the breaker's error to the outer level.
    pub fn flatten(self) -> Error<E> {
        match self {
            Error::Inner(inner) => inner,
            Error::CircuitOpen { remaining } => Error::CircuitOpen { remaining },
            Error::ProbeRejected { inflight, max } => Error::ProbeRejected { inflight, max },
            Error::RecoveredFault { message } => Error::RecoveredFault { message },
            Error::RetriesExhausted {
                attempts,
                last_error,
            } => Error::RetriesExhausted {
                attempts,
                last_error: last_error.map(|e| Box::new(e.flatten())),
            },
        }
    }
}

/// Invalid breaker or retry configuration. Only ever returned at construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive (is: {value})")]
    InvalidThreshold { name: &'static str, value: i64 },

    #[error("{name} must be >= 0 (is: {millis}ms)")]
    NegativeDuration { name: &'static str, millis: i64 },

    #[error("retries must be >= 0 (is: {value})")]
    NegativeRetries { value: i64 },

    #[error("sliding window capacity must be >= {name} (is: {capacity} < {threshold})")]
    WindowTooSmall {
        capacity: usize,
        name: &'static str,
        threshold: usize,
    },

    #[error("invalid settings: {message}")]
    InvalidSettings { message: String },
}

impl ConfigError {
    #[must_use]
    pub fn invalid_threshold(name: &'static str, value: i64) -> Self {
        ConfigError::InvalidThreshold { name, value }
    }

    #[must_use]
    pub fn negative_duration(name: &'static str, millis: i64) -> Self {
        ConfigError::NegativeDuration { name, millis }
    }

    #[must_use]
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        ConfigError::InvalidSettings {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::invalid_settings(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_classified() {
        let open: Error<String> = Error::CircuitOpen {
            remaining: Duration::from_secs(1),
        };
        let probe: Error<String> = Error::ProbeRejected {
            inflight: 1,
            max: 1,
        };
        assert!(open.is_rejection());
        assert!(probe.is_rejection());
        assert!(!Error::Inner("boom".to_string()).is_rejection());
        assert!(!Error::<String>::recovered_fault("oh no").is_rejection());
    }

    #[test]
    fn test_inner_error_display_is_transparent() {
        let err: Error<String> = Error::Inner("Doh!".to_string());
        assert_eq!(err.to_string(), "Doh!");
        assert_eq!(err.inner().map(String::as_str), Some("Doh!"));
        assert_eq!(err.into_inner().as_deref(), Some("Doh!"));
    }

    #[test]
    fn test_flatten_lifts_breaker_error() {
        let nested: Error<Error<String>> = Error::Inner(Error::CircuitOpen {
            remaining: Duration::from_millis(5),
        });
        assert!(matches!(nested.flatten(), Error::CircuitOpen { .. }));

        let nested: Error<Error<String>> = Error::RetriesExhausted {
            attempts: 3,
            last_error: Some(Box::new(Error::Inner(Error::Inner("x".to_string())))),
        };
        match nested.flatten() {
            Error::RetriesExhausted {
                attempts,
                last_error: Some(last),
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(last.into_inner().as_deref(), Some("x"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::invalid_threshold("failure threshold", 0).to_string(),
            "failure threshold must be positive (is: 0)"
        );
        assert_eq!(
            ConfigError::negative_duration("open delay", -1000).to_string(),
            "open delay must be >= 0 (is: -1000ms)"
        );
        assert_eq!(
            ConfigError::NegativeRetries { value: -1 }.to_string(),
            "retries must be >= 0 (is: -1)"
        );
    }
}
