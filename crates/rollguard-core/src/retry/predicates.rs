//! Retry predicates
//!
//! A predicate decides whether a failed attempt is worth retrying. The
//! executor defaults to [`AlwaysRetry`], which keeps the outcome set to
//! success, exhaustion and cancellation.

/// A predicate that determines whether an error should be retried
///
/// # Example
///
/// ```rust
/// use rollguard_core::retry::RetryPredicate;
/// use std::io::{Error, ErrorKind};
///
/// struct IoRetryPredicate;
///
/// impl RetryPredicate<Error> for IoRetryPredicate {
///     fn should_retry(&self, error: &Error) -> bool {
///         !matches!(
///             error.kind(),
///             ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::InvalidInput
///         )
///     }
/// }
/// ```
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    /// Determine whether the given error should be retried
    fn should_retry(&self, error: &E) -> bool;
}

/// A predicate that always returns true (all errors are retryable)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E: ?Sized> RetryPredicate<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E) -> bool {
        true
    }
}

/// A predicate that never retries (no errors are retryable)
#[derive(Debug, Clone, Copy)]
pub struct NeverRetry;

impl<E: ?Sized> RetryPredicate<E> for NeverRetry {
    fn should_retry(&self, _error: &E) -> bool {
        false
    }
}

/// A predicate that uses a closure to determine retryability
pub struct ClosurePredicate<F> {
    predicate: F,
}

impl<F> ClosurePredicate<F> {
    /// Create a new closure-based predicate
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> RetryPredicate<E> for ClosurePredicate<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_always_retry_predicate() {
        let error = io::Error::new(io::ErrorKind::NotFound, "not found");
        assert!(AlwaysRetry.should_retry(&error));
    }

    #[test]
    fn test_never_retry_predicate() {
        let error = io::Error::new(io::ErrorKind::TimedOut, "timeout");
        assert!(!NeverRetry.should_retry(&error));
    }

    #[test]
    fn test_closure_predicate() {
        let predicate =
            ClosurePredicate::new(|err: &io::Error| err.kind() == io::ErrorKind::TimedOut);

        assert!(predicate.should_retry(&io::Error::new(io::ErrorKind::TimedOut, "slow")));
        assert!(!predicate.should_retry(&io::Error::new(io::ErrorKind::NotFound, "gone")));
    }
}
