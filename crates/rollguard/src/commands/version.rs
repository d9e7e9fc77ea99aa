//! Version command
//!
//! Reports the build alongside the decision defaults compiled into it, so an
//! operator can tell what a config-less `rollguard gate` will do.

use anyhow::Result;
use rollguard_core::types::RollguardConfigFile;
use serde::Serialize;

use crate::cli::VersionArgs;
use crate::output;

/// Build identity plus the built-in policy defaults
#[derive(Debug, Serialize)]
struct BuildReport {
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'static str>,
    defaults: RollguardConfigFile,
}

impl BuildReport {
    fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_SHA"),
            defaults: RollguardConfigFile::default(),
        }
    }

    fn headline(&self) -> String {
        match self.commit {
            Some(commit) => format!("rollguard {} ({})", self.version, commit),
            None => format!("rollguard {}", self.version),
        }
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let report = BuildReport::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.headline());
    let retry = &report.defaults.retry;
    output::kv("Default max attempts", &retry.max_attempts.to_string());
    output::kv("Default base delay", &format!("{}ms", retry.base_delay_ms));
    output::kv(
        "Default p95 threshold",
        &format!("{}ms", report.defaults.canary.p95_threshold_ms),
    );

    Ok(())
}
