//! Retry policy and the exponential backoff law

use std::time::Duration;

use crate::error::{Error, Result};

/// Default number of attempts, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default backoff base
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

/// Bounded retry policy
///
/// Immutable once built. `max_attempts` counts every try including the first,
/// so `1` disables retrying altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Build a policy, rejecting `max_attempts == 0`
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self> {
        if max_attempts < 1 {
            return Err(Error::invalid_config(format!(
                "max-attempts must be at least 1, got {}",
                max_attempts
            )));
        }
        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    /// A policy that makes exactly one attempt
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

/// Upper bound of the jitter window after attempt `attempt` (1-indexed) fails
///
/// Equals `base_delay * 2^(attempt - 1)`, saturating at `Duration::MAX`.
///
/// # Example
///
/// ```rust
/// use rollguard_core::retry::{backoff_ceiling, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(4, Duration::from_millis(100)).unwrap();
/// assert_eq!(backoff_ceiling(&policy, 1), Duration::from_millis(100));
/// assert_eq!(backoff_ceiling(&policy, 3), Duration::from_millis(400));
/// ```
pub fn backoff_ceiling(policy: &RetryPolicy, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    match 1u32.checked_shl(exponent) {
        Some(factor) => policy.base_delay.saturating_mul(factor),
        None if policy.base_delay.is_zero() => Duration::ZERO,
        None => Duration::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_attempts() {
        let err = RetryPolicy::new(0, Duration::from_millis(10)).unwrap_err();
        assert!(err.is_invalid_config());
        assert!(err.to_string().contains("max-attempts"));
    }

    #[test]
    fn test_accepts_zero_base_delay() {
        let policy = RetryPolicy::new(3, Duration::ZERO).unwrap();
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.base_delay().is_zero());
    }

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.base_delay(), Duration::from_millis(100));
        assert_eq!(RetryPolicy::single_attempt().max_attempts(), 1);
    }

    #[test]
    fn test_ceiling_doubles_per_attempt() {
        let policy = RetryPolicy::new(6, Duration::from_millis(100)).unwrap();

        assert_eq!(backoff_ceiling(&policy, 1), Duration::from_millis(100)); // 100 * 2^0
        assert_eq!(backoff_ceiling(&policy, 2), Duration::from_millis(200)); // 100 * 2^1
        assert_eq!(backoff_ceiling(&policy, 3), Duration::from_millis(400)); // 100 * 2^2
        assert_eq!(backoff_ceiling(&policy, 4), Duration::from_millis(800)); // 100 * 2^3
        assert_eq!(backoff_ceiling(&policy, 5), Duration::from_millis(1600)); // 100 * 2^4
    }

    #[test]
    fn test_ceiling_zero_base() {
        let policy = RetryPolicy::new(10, Duration::ZERO).unwrap();
        for attempt in 1..=64 {
            assert_eq!(backoff_ceiling(&policy, attempt), Duration::ZERO);
        }
    }

    #[test]
    fn test_ceiling_saturates() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_secs(1)).unwrap();
        assert_eq!(backoff_ceiling(&policy, 40), Duration::MAX);
        assert_eq!(backoff_ceiling(&policy, u32::MAX), Duration::MAX);
        assert_eq!(
            backoff_ceiling(&policy, 32),
            Duration::from_secs(1u64 << 31)
        );
    }
}
