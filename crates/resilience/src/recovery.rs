//! Fault boundary that turns a panicking job into an error value.

use failguard_core::{Error, Result};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

/// A panic captured while building or polling a job future
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("panic: {message}")]
pub struct Fault {
    message: String,
}

impl Fault {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }

    /// Description of the panic payload
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

/// Run `job`, converting a panic into a [`Fault`].
///
/// Covers both the synchronous call that creates the future and every poll
/// of it. When nothing panics the job's output is returned untouched.
pub async fn catch_fault<F, Fut>(job: F) -> std::result::Result<Fut::Output, Fault>
where
    F: FnOnce() -> Fut,
    Fut: Future,
{
    let future = panic::catch_unwind(AssertUnwindSafe(job)).map_err(Fault::from_payload)?;
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(Fault::from_payload)
}

/// Execute a job, behind the fault boundary when `recover` is set.
pub(crate) async fn execute<F, Fut, T, E>(job: F, recover: bool) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    if !recover {
        return job().await.map_err(Error::Inner);
    }

    match catch_fault(job).await {
        Ok(outcome) => outcome.map_err(Error::Inner),
        Err(fault) => {
            tracing::warn!(panic = %fault.message(), "Recovered from panic in job");
            Err(Error::RecoveredFault {
                message: fault.into_message(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_output_through() {
        let out = catch_fault(|| async { Ok::<_, String>(42) }).await;
        assert_eq!(out, Ok(Ok(42)));

        let out = catch_fault(|| async { Err::<i32, _>("Doh!".to_string()) }).await;
        assert_eq!(out, Ok(Err("Doh!".to_string())));
    }

    #[tokio::test]
    async fn test_captures_panic_while_polling() {
        let fault = catch_fault(|| async {
            panic!("oh no!");
        })
        .await
        .unwrap_err();
        assert_eq!(fault.message(), "oh no!");
    }

    #[tokio::test]
    async fn test_captures_panic_before_future_exists() {
        let fault = catch_fault(|| -> std::future::Ready<()> { panic!("formatted {}", 7) })
            .await
            .unwrap_err();
        assert_eq!(fault.message(), "formatted 7");
    }

    #[tokio::test]
    async fn test_non_string_payload() {
        let fault = catch_fault(|| async {
            std::panic::panic_any(17_u8);
        })
        .await
        .unwrap_err();
        assert_eq!(fault.message(), "non-string panic payload");
    }

    #[tokio::test]
    async fn test_execute_maps_fault_to_error() {
        let result: Result<(), String> = execute(|| async { panic!("oh no!") }, true).await;
        match result {
            Err(Error::RecoveredFault { message }) => assert_eq!(message, "oh no!"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_without_recovery_wraps_job_error() {
        let result: Result<(), &str> = execute(|| async { Err("Doh!") }, false).await;
        assert!(matches!(result, Err(Error::Inner("Doh!"))));
    }

    #[tokio::test]
    #[should_panic(expected = "oh no!")]
    async fn test_execute_without_recovery_propagates_panic() {
        let _: Result<(), String> = execute(|| async { panic!("oh no!") }, false).await;
    }
}
