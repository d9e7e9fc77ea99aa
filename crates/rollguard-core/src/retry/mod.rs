//! Bounded, jittered, cancellable retry
//!
//! # Features
//!
//! - Exponential backoff: the window after attempt `n` is `base_delay * 2^(n-1)`
//! - Full jitter: the actual sleep is drawn uniformly from `[0, window)`
//! - Cancellation via `tokio_util::sync::CancellationToken`, checked before
//!   every attempt and raced against attempts and sleeps
//! - Explicit outcomes: `Ok(T)` or a `RetryError` that tells exhaustion apart
//!   from cancellation
//! - Observable attempts via the `RetryObserver` trait
//!
//! # Example
//!
//! ```rust,no_run
//! use rollguard_core::retry::{retry_with_policy, RetryError, RetryPolicy};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     let policy = RetryPolicy::new(5, Duration::from_millis(100)).unwrap();
//!     let cancel = CancellationToken::new();
//!
//!     retry_with_policy(&policy, &cancel, || async {
//!         Ok("success".to_string())
//!     })
//!     .await
//! }
//! ```

mod error;
mod executor;
mod jitter;
mod observer;
mod policy;
mod predicates;

pub use error::{CancelReason, RetryError};
pub use executor::{retry_with_policy, RetryExecutor, RetryExecutorBuilder};
pub use jitter::{JitterSource, NoJitter, SharedJitter};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use policy::{backoff_ceiling, RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
pub use predicates::{AlwaysRetry, ClosurePredicate, NeverRetry, RetryPredicate};
