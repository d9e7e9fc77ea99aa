//! Rollback gate: fetch metrics under retry, then decide
//!
//! The gate wires the two primitives together the way a rollout controller
//! uses them. It returns the verdict and leaves acting on it to the caller.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::evaluator::{CanaryEvaluator, Verdict};
use super::observation::Observation;
use crate::error::{Error, Result};
use crate::retry::{JitterSource, RetryError, RetryExecutor, RetryObserver, RetryPredicate};

/// A source of pre-aggregated canary health metrics
///
/// Implementors wrap whatever backend holds the numbers (a metrics API, a
/// file, a test fixture). Each `fetch` is one attempt; retrying is the
/// gate's job.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    type Error: std::error::Error + Send + 'static;

    /// Short name used in log records
    fn name(&self) -> &str;

    /// Fetch the current observation
    async fn fetch(&self) -> std::result::Result<Observation, Self::Error>;
}

/// Fetches an observation with retry and evaluates it
pub struct RollbackGate<S, P, O, J> {
    source: S,
    executor: RetryExecutor<P, O, J>,
    evaluator: CanaryEvaluator,
}

impl<S, P, O, J> RollbackGate<S, P, O, J>
where
    S: MetricsSource,
    P: RetryPredicate<S::Error>,
    O: RetryObserver,
    J: JitterSource,
{
    pub fn new(source: S, executor: RetryExecutor<P, O, J>, evaluator: CanaryEvaluator) -> Self {
        Self {
            source,
            executor,
            evaluator,
        }
    }

    pub fn evaluator(&self) -> &CanaryEvaluator {
        &self.evaluator
    }

    /// Fetch one observation and decide
    ///
    /// Fetch failures surface as the executor's `RetryError`, so a caller can
    /// tell "metrics unavailable" apart from "asked to stop".
    pub async fn check(
        &self,
        cancel: &CancellationToken,
    ) -> std::result::Result<Verdict, RetryError<S::Error>> {
        debug!(source = %self.source.name(), "fetching canary metrics");

        let observation = self
            .executor
            .execute(|| self.source.fetch(), cancel)
            .await?;

        let verdict = self.evaluator.evaluate(&observation);
        match verdict.reason() {
            Some(reason) => info!(
                source = %self.source.name(),
                p95_latency_ms = observation.p95_latency_ms(),
                error_rate = observation.error_rate(),
                reason = %reason,
                "canary breached threshold, rollback advised"
            ),
            None => info!(
                source = %self.source.name(),
                p95_latency_ms = observation.p95_latency_ms(),
                error_rate = observation.error_rate(),
                "canary healthy"
            ),
        }

        Ok(verdict)
    }
}

/// Reads an observation from a JSON document on disk
///
/// Expected shape: `{"p95_latency_ms": 87.5, "error_rate": 0.01}`.
#[derive(Debug, Clone)]
pub struct FileMetricsSource {
    path: Utf8PathBuf,
}

impl FileMetricsSource {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[async_trait]
impl MetricsSource for FileMetricsSource {
    type Error = Error;

    fn name(&self) -> &str {
        self.path.as_str()
    }

    async fn fetch(&self) -> Result<Observation> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
