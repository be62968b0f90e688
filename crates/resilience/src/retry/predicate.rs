//! Continuation predicates deciding whether another attempt is made.

use failguard_core::Result;

/// Decides from an attempt's outcome whether to try again.
///
/// Implemented for [`RetryOnError`] and for any
/// `Fn(&Result<T, E>) -> bool` closure.
pub trait RetryPredicate<T, E> {
    fn should_retry(&self, outcome: &Result<T, E>) -> bool;
}

/// Default predicate: retry iff the attempt returned an error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryOnError;

impl<T, E> RetryPredicate<T, E> for RetryOnError {
    fn should_retry(&self, outcome: &Result<T, E>) -> bool {
        outcome.is_err()
    }
}

impl<T, E, F> RetryPredicate<T, E> for F
where
    F: Fn(&Result<T, E>) -> bool,
{
    fn should_retry(&self, outcome: &Result<T, E>) -> bool {
        self(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use failguard_core::Error;

    #[test]
    fn test_retry_on_error() {
        let ok: Result<i32, String> = Ok(1);
        let err: Result<i32, String> = Err(Error::Inner("x".to_string()));
        assert!(!RetryOnError.should_retry(&ok));
        assert!(RetryOnError.should_retry(&err));
    }

    #[test]
    fn test_closure_predicate() {
        let below_fifteen = |outcome: &Result<i32, String>| matches!(outcome, Ok(v) if *v < 15);
        assert!(below_fifteen.should_retry(&Ok(3)));
        assert!(!below_fifteen.should_retry(&Ok(15)));
        assert!(!below_fifteen.should_retry(&Err(Error::Inner("x".to_string()))));
    }
}
