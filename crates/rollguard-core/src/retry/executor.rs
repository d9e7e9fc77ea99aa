//! Retry execution engine
//!
//! Runs a caller-supplied async operation under a [`RetryPolicy`]: exponential
//! backoff with full jitter between attempts, and a cancellation token raced
//! against every suspension point.

use std::error::Error;
use std::future::Future;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use super::error::{CancelReason, RetryError};
use super::jitter::{JitterSource, SharedJitter};
use super::observer::{NoOpObserver, RetryObserver};
use super::policy::{backoff_ceiling, RetryPolicy};
use super::predicates::{AlwaysRetry, RetryPredicate};

/// Execute an async operation with retry logic based on a policy
///
/// Convenience wrapper around a default [`RetryExecutor`] with an
/// entropy-seeded jitter source. For more control, use
/// [`RetryExecutorBuilder`].
///
/// # Example
///
/// ```rust,no_run
/// use rollguard_core::retry::{retry_with_policy, RetryPolicy};
/// use tokio_util::sync::CancellationToken;
///
/// async fn example() {
///     let policy = RetryPolicy::default();
///     let cancel = CancellationToken::new();
///
///     let result = retry_with_policy(&policy, &cancel, || async {
///         Ok::<_, std::io::Error>("success")
///     })
///     .await;
/// }
/// ```
pub async fn retry_with_policy<F, Fut, T, E>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error,
{
    RetryExecutorBuilder::new()
        .with_policy(*policy)
        .build()
        .execute(op, cancel)
        .await
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use rollguard_core::retry::{RetryExecutorBuilder, RetryPolicy, SharedJitter, TracingObserver};
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("fetch-metrics"))
///     .with_jitter(SharedJitter::seeded(7))
///     .build();
/// ```
pub struct RetryExecutorBuilder<P = AlwaysRetry, O = NoOpObserver, J = SharedJitter> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
    jitter: J,
}

impl Default for RetryExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            predicate: AlwaysRetry,
            observer: NoOpObserver,
            jitter: SharedJitter::from_entropy(),
        }
    }
}

impl<P, O, J> RetryExecutorBuilder<P, O, J> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the retry predicate
    ///
    /// Failures the predicate rejects end the loop with
    /// `RetryError::NonRetryable`.
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutorBuilder<P2, O, J> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate,
            observer: self.observer,
            jitter: self.jitter,
        }
    }

    /// Set the observer
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<P, O2, J> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate: self.predicate,
            observer,
            jitter: self.jitter,
        }
    }

    /// Set the jitter source used to draw each backoff delay
    pub fn with_jitter<J2>(self, jitter: J2) -> RetryExecutorBuilder<P, O, J2> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate: self.predicate,
            observer: self.observer,
            jitter,
        }
    }

    /// Build the executor
    pub fn build(self) -> RetryExecutor<P, O, J> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer: self.observer,
            jitter: self.jitter,
        }
    }
}

/// A retry executor with configurable policy, predicate, observer and jitter
///
/// Safe to share between tasks: `execute` takes `&self` and keeps its loop
/// state on the stack of each call. The jitter source is the only shared
/// mutable piece.
pub struct RetryExecutor<P = AlwaysRetry, O = NoOpObserver, J = SharedJitter> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
    jitter: J,
}

impl<P, O, J> RetryExecutor<P, O, J> {
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<P, O, J> RetryExecutor<P, O, J>
where
    O: RetryObserver,
    J: JitterSource,
{
    /// Execute an operation with retry logic
    ///
    /// `op` is called once per attempt and must be safe to call again after
    /// a failure. The token is checked before each attempt and raced against
    /// both the attempt and the backoff sleep; once it fires no further
    /// attempt or sleep happens.
    pub async fn execute<F, Fut, T, E>(
        &self,
        mut op: F,
        cancel: &CancellationToken,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error,
        P: RetryPredicate<E>,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts();
        let mut last_error: Option<E> = None;
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(self.cancelled(attempt, CancelReason::BeforeAttempt, last_error));
            }

            attempt += 1;
            self.observer.on_attempt_start(attempt, max_attempts);

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Err(self.cancelled(attempt, CancelReason::DuringAttempt, last_error));
                }
                outcome = op() => outcome,
            };

            let err = match outcome {
                Ok(value) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !self.predicate.should_retry(&err) {
                self.observer.on_non_retryable(attempt, &err);
                return Err(RetryError::non_retryable(err));
            }

            if attempt >= max_attempts {
                self.observer.on_exhausted(attempt, &err);
                return Err(RetryError::exhausted(attempt, err, start.elapsed()));
            }

            let delay = self.jitter.draw(backoff_ceiling(&self.policy, attempt));
            self.observer.on_attempt_failed(attempt, &err, delay);
            last_error = Some(err);

            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        return Err(self.cancelled(attempt, CancelReason::DuringBackoff, last_error));
                    }
                    () = tokio::time::sleep(delay) => {}
                }
            }
        }
    }

    fn cancelled<E>(
        &self,
        attempts: u32,
        reason: CancelReason,
        last_error: Option<E>,
    ) -> RetryError<E> {
        self.observer.on_cancelled(attempts, reason);
        RetryError::cancelled(attempts, reason, last_error)
    }
}
