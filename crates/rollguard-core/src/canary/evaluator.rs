//! Canary rollback decisions
//!
//! `CanaryEvaluator` is a pure policy object. It holds two immutable limits,
//! keeps no history, and maps an [`Observation`] to a decision. Thresholds
//! are inclusive: a reading equal to its limit triggers rollback.

use std::fmt;

use serde::Serialize;

use super::observation::Observation;
use crate::error::{Error, Result};
use crate::types::CanarySettings;

/// Which health metric crossed its limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "metric", rename_all = "kebab-case")]
pub enum RollbackReason {
    /// p95 latency reached the latency threshold
    P95Latency { observed_ms: f64, threshold_ms: f64 },
    /// Error rate reached the opt-in error-rate threshold
    ErrorRate { observed: f64, threshold: f64 },
}

impl fmt::Display for RollbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackReason::P95Latency {
                observed_ms,
                threshold_ms,
            } => write!(
                f,
                "p95 latency {}ms reached threshold {}ms",
                observed_ms, threshold_ms
            ),
            RollbackReason::ErrorRate {
                observed,
                threshold,
            } => write!(
                f,
                "error rate {:.4} reached threshold {:.4}",
                observed, threshold
            ),
        }
    }
}

/// Outcome of evaluating one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum Verdict {
    /// Every metric is below its limit
    Healthy,
    /// At least one limit was reached
    Rollback(RollbackReason),
}

impl Verdict {
    pub fn should_rollback(&self) -> bool {
        matches!(self, Verdict::Rollback(_))
    }

    pub fn reason(&self) -> Option<&RollbackReason> {
        match self {
            Verdict::Healthy => None,
            Verdict::Rollback(reason) => Some(reason),
        }
    }
}

/// Canary health policy
///
/// # Example
///
/// ```rust
/// use rollguard_core::canary::{CanaryEvaluator, Observation};
///
/// let evaluator = CanaryEvaluator::new(100.0).unwrap();
/// assert!(evaluator.should_rollback(&Observation::latency_only(100.0).unwrap()));
/// assert!(!evaluator.should_rollback(&Observation::latency_only(90.0).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanaryEvaluator {
    p95_threshold_ms: f64,
    error_rate_threshold: Option<f64>,
}

impl CanaryEvaluator {
    /// Build an evaluator that only looks at p95 latency
    ///
    /// Fails for a threshold that is not a positive, finite number.
    pub fn new(p95_threshold_ms: f64) -> Result<Self> {
        if !p95_threshold_ms.is_finite() || p95_threshold_ms <= 0.0 {
            return Err(Error::invalid_config(format!(
                "p95-threshold-ms must be a positive number, got {}",
                p95_threshold_ms
            )));
        }
        Ok(Self {
            p95_threshold_ms,
            error_rate_threshold: None,
        })
    }

    /// Also roll back when the error rate reaches `threshold`
    ///
    /// The error rate is ignored unless this is called; `threshold` must lie
    /// in `(0, 1]`.
    pub fn with_error_rate_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::invalid_config(format!(
                "error-rate-threshold must be a fraction in (0, 1], got {}",
                threshold
            )));
        }
        self.error_rate_threshold = Some(threshold);
        Ok(self)
    }

    pub fn from_settings(settings: &CanarySettings) -> Result<Self> {
        let evaluator = Self::new(settings.p95_threshold_ms)?;
        match settings.error_rate_threshold {
            Some(threshold) => evaluator.with_error_rate_threshold(threshold),
            None => Ok(evaluator),
        }
    }

    pub fn p95_threshold_ms(&self) -> f64 {
        self.p95_threshold_ms
    }

    pub fn error_rate_threshold(&self) -> Option<f64> {
        self.error_rate_threshold
    }

    /// Whether the canary should be rolled back
    pub fn should_rollback(&self, observation: &Observation) -> bool {
        self.evaluate(observation).should_rollback()
    }

    /// Evaluate an observation, reporting which limit was reached
    ///
    /// Latency is checked first, so it is the reported reason when both
    /// limits are reached.
    pub fn evaluate(&self, observation: &Observation) -> Verdict {
        let latency = observation.p95_latency_ms();
        if latency >= self.p95_threshold_ms {
            return Verdict::Rollback(RollbackReason::P95Latency {
                observed_ms: latency,
                threshold_ms: self.p95_threshold_ms,
            });
        }

        if let Some(threshold) = self.error_rate_threshold {
            let rate = observation.error_rate();
            if rate >= threshold {
                return Verdict::Rollback(RollbackReason::ErrorRate {
                    observed: rate,
                    threshold,
                });
            }
        }

        Verdict::Healthy
    }
}
