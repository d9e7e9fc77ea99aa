//! Full-jitter delay sources
//!
//! The executor owns its random source instead of reaching for a global one,
//! so concurrent retry loops only share what they are handed.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws the actual backoff delay from a ceiling
///
/// Implementations must never exceed the ceiling and must return
/// `Duration::ZERO` for a zero ceiling. [`SharedJitter`] draws uniformly
/// from `[0, ceiling)`.
pub trait JitterSource: Send + Sync {
    fn draw(&self, ceiling: Duration) -> Duration;
}

/// Thread-safe full-jitter source backed by a mutex-guarded `StdRng`
///
/// The lock is held only for the draw itself.
#[derive(Debug)]
pub struct SharedJitter {
    rng: Mutex<StdRng>,
}

impl SharedJitter {
    /// Seed from operating system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Seed deterministically, for reproducible backoff schedules
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SharedJitter {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl JitterSource for SharedJitter {
    fn draw(&self, ceiling: Duration) -> Duration {
        let ceiling_nanos = u64::try_from(ceiling.as_nanos()).unwrap_or(u64::MAX);
        if ceiling_nanos == 0 {
            return Duration::ZERO;
        }
        // A panic elsewhere cannot leave StdRng in a bad state
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Duration::from_nanos(rng.random_range(0..ceiling_nanos))
    }
}

/// Always waits the full ceiling; deterministic, mostly useful in tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn draw(&self, ceiling: Duration) -> Duration {
        ceiling
    }
}

impl<T: JitterSource + ?Sized> JitterSource for std::sync::Arc<T> {
    fn draw(&self, ceiling: Duration) -> Duration {
        (**self).draw(ceiling)
    }
}

impl<T: JitterSource + ?Sized> JitterSource for Box<T> {
    fn draw(&self, ceiling: Duration) -> Duration {
        (**self).draw(ceiling)
    }
}
