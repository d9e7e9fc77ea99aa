//! # rollguard-core
//!
//! Core library for rollguard providing:
//! - Bounded retry with exponential backoff, full jitter and cancellation
//! - Canary rollback decisions from p95 latency (and, opt-in, error rate)
//! - A rollback gate composing the two for rollout controllers
//! - Configuration file parsing (rollguard.yaml)

pub mod canary;
pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use canary::{CanaryEvaluator, Observation, RollbackGate, Verdict};
pub use config::RollguardConfig;
pub use error::{Error, Result};
pub use retry::{RetryError, RetryExecutor, RetryExecutorBuilder, RetryPolicy};
