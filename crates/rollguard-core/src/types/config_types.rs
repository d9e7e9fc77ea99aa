//! Configuration file types
//!
//! These mirror `rollguard.yaml`. Values are plain numbers here; they are
//! validated when turned into a `RetryPolicy` or `CanaryEvaluator`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;
use crate::retry::{RetryPolicy, SharedJitter, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RollguardConfigFile {
    /// Retry policy for metrics fetches and other remote calls
    #[serde(default)]
    pub retry: RetrySettings,

    /// Canary rollback thresholds
    #[serde(default)]
    pub canary: CanarySettings,
}

/// Retry policy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetrySettings {
    /// Total attempts including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff base in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Fixed jitter seed; entropy-seeded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter_seed: Option<u64>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            jitter_seed: None,
        }
    }
}

impl RetrySettings {
    /// Validate into a `RetryPolicy`
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }

    /// Jitter source honoring `jitter-seed`
    pub fn jitter(&self) -> SharedJitter {
        match self.jitter_seed {
            Some(seed) => SharedJitter::seeded(seed),
            None => SharedJitter::from_entropy(),
        }
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY.as_millis() as u64
}

/// Canary threshold settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CanarySettings {
    /// Roll back when p95 latency reaches this many milliseconds
    #[serde(default = "default_p95_threshold_ms")]
    pub p95_threshold_ms: f64,

    /// Opt-in error-rate limit (fraction); unused when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate_threshold: Option<f64>,
}

impl Default for CanarySettings {
    fn default() -> Self {
        Self {
            p95_threshold_ms: default_p95_threshold_ms(),
            error_rate_threshold: None,
        }
    }
}

fn default_p95_threshold_ms() -> f64 {
    1000.0
}
