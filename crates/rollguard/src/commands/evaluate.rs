//! Evaluate command

use std::process::ExitCode;

use anyhow::{Context, Result};
use camino::Utf8Path;
use rollguard_core::types::CanarySettings;
use rollguard_core::{CanaryEvaluator, Observation, RollguardConfig};

use super::{print_verdict, verdict_exit_code};
use crate::cli::EvaluateArgs;

pub fn run(args: EvaluateArgs, config_path: Option<&Utf8Path>) -> Result<ExitCode> {
    let loaded =
        RollguardConfig::load_or_default(config_path).context("Failed to load configuration")?;
    let settings = effective_settings(&loaded.config.canary, &args);
    let evaluator =
        CanaryEvaluator::from_settings(&settings).context("Invalid canary thresholds")?;

    let observation =
        Observation::new(args.p95_ms, args.error_rate).context("Invalid observation")?;

    tracing::debug!(
        p95_latency_ms = observation.p95_latency_ms(),
        error_rate = observation.error_rate(),
        threshold_ms = evaluator.p95_threshold_ms(),
        "evaluating canary observation"
    );

    let verdict = evaluator.evaluate(&observation);
    print_verdict(&verdict, args.json)?;
    Ok(verdict_exit_code(&verdict))
}

/// Apply command-line overrides on top of the configured thresholds
fn effective_settings(configured: &CanarySettings, args: &EvaluateArgs) -> CanarySettings {
    CanarySettings {
        p95_threshold_ms: args.threshold_ms.unwrap_or(configured.p95_threshold_ms),
        error_rate_threshold: args
            .error_rate_threshold
            .or(configured.error_rate_threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(threshold_ms: Option<f64>, error_rate_threshold: Option<f64>) -> EvaluateArgs {
        EvaluateArgs {
            p95_ms: 100.0,
            error_rate: 0.0,
            threshold_ms,
            error_rate_threshold,
            json: false,
        }
    }

    #[test]
    fn test_overrides_win() {
        let configured = CanarySettings {
            p95_threshold_ms: 500.0,
            error_rate_threshold: Some(0.1),
        };

        let settings = effective_settings(&configured, &args(Some(100.0), Some(0.2)));
        assert_eq!(settings.p95_threshold_ms, 100.0);
        assert_eq!(settings.error_rate_threshold, Some(0.2));
    }

    #[test]
    fn test_configured_values_kept_without_overrides() {
        let configured = CanarySettings {
            p95_threshold_ms: 500.0,
            error_rate_threshold: None,
        };

        let settings = effective_settings(&configured, &args(None, None));
        assert_eq!(settings, configured);
    }
}
