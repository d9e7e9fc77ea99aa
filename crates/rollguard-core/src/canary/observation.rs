//! Health observations fed to the canary evaluator

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pre-aggregated health metrics for one canary measurement window
///
/// Fields are validated on construction and on deserialization: latency is
/// finite and non-negative, error rate is a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObservation")]
pub struct Observation {
    p95_latency_ms: f64,
    error_rate: f64,
}

/// Unvalidated wire shape of an observation
#[derive(Debug, Deserialize)]
struct RawObservation {
    p95_latency_ms: f64,
    #[serde(default)]
    error_rate: f64,
}

impl TryFrom<RawObservation> for Observation {
    type Error = Error;

    fn try_from(raw: RawObservation) -> Result<Self> {
        Self::new(raw.p95_latency_ms, raw.error_rate)
    }
}

impl Observation {
    pub fn new(p95_latency_ms: f64, error_rate: f64) -> Result<Self> {
        if !p95_latency_ms.is_finite() || p95_latency_ms < 0.0 {
            return Err(Error::invalid_observation(format!(
                "p95 latency must be a non-negative number of milliseconds, got {}",
                p95_latency_ms
            )));
        }
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(Error::invalid_observation(format!(
                "error rate must be a fraction in [0, 1], got {}",
                error_rate
            )));
        }
        Ok(Self {
            p95_latency_ms,
            error_rate,
        })
    }

    /// Observation carrying only a latency reading
    pub fn latency_only(p95_latency_ms: f64) -> Result<Self> {
        Self::new(p95_latency_ms, 0.0)
    }

    pub fn p95_latency_ms(&self) -> f64 {
        self.p95_latency_ms
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }
}
