//! Error types for the retry execution engine
//!
//! A retried call ends in exactly one of: success, exhaustion, cancellation,
//! or (only when a predicate is configured) a non-retryable failure. The
//! last three are the variants of [`RetryError`].

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Where the cancellation signal was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The token was already cancelled when the next attempt was due
    BeforeAttempt,
    /// The token fired while an attempt was in flight; the attempt was dropped
    DuringAttempt,
    /// The token fired while waiting out a backoff window
    DuringBackoff,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CancelReason::BeforeAttempt => "before attempt",
            CancelReason::DuringAttempt => "during attempt",
            CancelReason::DuringBackoff => "during backoff",
        };
        f.write_str(s)
    }
}

/// Errors that can occur during retry execution
///
/// The error type is generic over `E`, the underlying error type from the
/// operation being retried.
#[derive(Debug)]
pub enum RetryError<E> {
    /// All retry attempts have been exhausted
    Exhausted {
        /// Number of attempts made before giving up
        attempts: u32,
        /// The error from the final attempt
        source: E,
        /// Total duration spent across all attempts and backoff windows
        total_duration: Duration,
    },

    /// The caller cancelled the retry loop
    ///
    /// Never produced by the operation itself; only the cancellation token
    /// leads here.
    Cancelled {
        /// Number of attempts started before cancellation
        attempts: u32,
        /// Where the cancellation was observed
        reason: CancelReason,
        /// The last failure captured before cancellation, if any
        last_error: Option<E>,
    },

    /// A `RetryPredicate` classified the failure as permanent
    NonRetryable(E),
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted {
                attempts,
                source,
                total_duration,
            } => {
                write!(
                    f,
                    "retry exhausted after {} attempts over {:.2}s: {}",
                    attempts,
                    total_duration.as_secs_f64(),
                    source
                )
            }
            RetryError::Cancelled {
                attempts,
                reason,
                last_error,
            } => {
                if let Some(err) = last_error {
                    write!(
                        f,
                        "retry cancelled {} after {} attempts: {}",
                        reason, attempts, err
                    )
                } else {
                    write!(f, "retry cancelled {} after {} attempts", reason, attempts)
                }
            }
            RetryError::NonRetryable(source) => {
                write!(f, "non-retryable error: {}", source)
            }
        }
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Cancelled {
                last_error: Some(err),
                ..
            } => Some(err),
            RetryError::NonRetryable(source) => Some(source),
            _ => None,
        }
    }
}

impl<E> RetryError<E> {
    /// Create a new exhausted error
    pub fn exhausted(attempts: u32, source: E, total_duration: Duration) -> Self {
        RetryError::Exhausted {
            attempts,
            source,
            total_duration,
        }
    }

    /// Create a new cancelled error
    pub fn cancelled(attempts: u32, reason: CancelReason, last_error: Option<E>) -> Self {
        RetryError::Cancelled {
            attempts,
            reason,
            last_error,
        }
    }

    /// Create a new non-retryable error
    pub fn non_retryable(source: E) -> Self {
        RetryError::NonRetryable(source)
    }

    /// Get the number of attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Cancelled { attempts, .. } => *attempts,
            RetryError::NonRetryable(_) => 1,
        }
    }

    /// Check if this error indicates all retries were exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// Check if this error indicates cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }

    /// Check if this error is non-retryable
    pub fn is_non_retryable(&self) -> bool {
        matches!(self, RetryError::NonRetryable(_))
    }

    /// Where cancellation was observed, if this is a cancellation
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            RetryError::Cancelled { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Get the underlying error, consuming this error
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Cancelled { last_error, .. } => last_error,
            RetryError::NonRetryable(source) => Some(source),
        }
    }

    /// Get a reference to the underlying error
    pub fn source_ref(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Cancelled { last_error, .. } => last_error.as_ref(),
            RetryError::NonRetryable(source) => Some(source),
        }
    }

    /// Map the error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            RetryError::Exhausted {
                attempts,
                source,
                total_duration,
            } => RetryError::Exhausted {
                attempts,
                source: f(source),
                total_duration,
            },
            RetryError::Cancelled {
                attempts,
                reason,
                last_error,
            } => RetryError::Cancelled {
                attempts,
                reason,
                last_error: last_error.map(f),
            },
            RetryError::NonRetryable(source) => RetryError::NonRetryable(f(source)),
        }
    }
}
