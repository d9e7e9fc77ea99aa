//! Config command

use anyhow::{Context, Result};
use camino::Utf8Path;
use rollguard_core::RollguardConfig;

use crate::cli::{ConfigCommands, ConfigShowArgs, ConfigValidateArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Validate(args) => validate(args, config_path),
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn validate(args: ConfigValidateArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let path = args.file.as_deref().or(config_path);

    let loaded = match RollguardConfig::load(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            output::error(&format!("Configuration is invalid: {}", e));
            return Err(e.into());
        }
    };

    output::success(&format!("Configuration is valid: {}", loaded.source_label()));
    Ok(())
}

fn show(args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let loaded =
        RollguardConfig::load_or_default(config_path).context("Failed to load configuration")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&loaded.config)?);
        return Ok(());
    }

    let retry = &loaded.config.retry;
    let canary = &loaded.config.canary;

    output::header("rollguard configuration");
    output::kv("Source", loaded.source_label());

    output::header("Retry");
    output::kv("Max attempts", &retry.max_attempts.to_string());
    output::kv("Base delay", &format!("{}ms", retry.base_delay_ms));
    output::kv(
        "Jitter seed",
        &retry
            .jitter_seed
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "entropy".to_string()),
    );

    output::header("Canary");
    output::kv("p95 threshold", &format!("{}ms", canary.p95_threshold_ms));
    output::kv(
        "Error-rate threshold",
        &canary
            .error_rate_threshold
            .map(|t| t.to_string())
            .unwrap_or_else(|| "not used".to_string()),
    );

    Ok(())
}
