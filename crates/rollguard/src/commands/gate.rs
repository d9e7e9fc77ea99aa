//! Gate command

use std::process::ExitCode;

use anyhow::{Context, Result};
use camino::Utf8Path;
use rollguard_core::canary::FileMetricsSource;
use rollguard_core::retry::{ClosurePredicate, TracingObserver};
use rollguard_core::{Error, RetryExecutorBuilder, RollbackGate, RollguardConfig};
use tokio_util::sync::CancellationToken;

use super::{print_verdict, verdict_exit_code};
use crate::cli::GateArgs;
use crate::output;

pub async fn run(args: GateArgs, config_path: Option<&Utf8Path>) -> Result<ExitCode> {
    let loaded =
        RollguardConfig::load_or_default(config_path).context("Failed to load configuration")?;

    let executor = RetryExecutorBuilder::new()
        .with_policy(loaded.retry_policy()?)
        .with_predicate(ClosurePredicate::new(Error::is_transient))
        .with_observer(TracingObserver::new("fetch-metrics"))
        .with_jitter(loaded.config.retry.jitter())
        .build();

    let gate = RollbackGate::new(
        FileMetricsSource::new(args.metrics_file.clone()),
        executor,
        loaded.evaluator()?,
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    if !args.json {
        output::info(&format!("Reading canary metrics from {}", args.metrics_file));
    }

    let verdict = gate.check(&cancel).await.with_context(|| {
        format!(
            "Could not obtain canary metrics from {}",
            args.metrics_file
        )
    })?;

    print_verdict(&verdict, args.json)?;
    Ok(verdict_exit_code(&verdict))
}
