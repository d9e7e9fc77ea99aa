//! Command implementations

pub mod config;
pub mod evaluate;
pub mod gate;
pub mod version;

use std::process::ExitCode;

use rollguard_core::Verdict;

/// Exit status when rollback is advised
pub const EXIT_ROLLBACK: u8 = 2;

/// Map a verdict to the process exit status
pub fn verdict_exit_code(verdict: &Verdict) -> ExitCode {
    if verdict.should_rollback() {
        ExitCode::from(EXIT_ROLLBACK)
    } else {
        ExitCode::SUCCESS
    }
}

/// Print a verdict for humans or as JSON
pub fn print_verdict(verdict: &Verdict, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(verdict)?);
        return Ok(());
    }

    match verdict.reason() {
        Some(reason) => crate::output::warning(&format!("Rollback advised: {}", reason)),
        None => crate::output::success("Canary healthy"),
    }
    Ok(())
}
