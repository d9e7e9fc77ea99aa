//! rollguard CLI - canary rollback decisions for rollout controllers
//!
//! This is the main entry point for the rollguard command-line interface.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Version(args) => commands::version::run(args).map(|()| ExitCode::SUCCESS),
        Commands::Config(cmd) => {
            commands::config::run(cmd, cli.config.as_deref()).map(|()| ExitCode::SUCCESS)
        }
        Commands::Evaluate(args) => commands::evaluate::run(args, cli.config.as_deref()),
        Commands::Gate(args) => commands::gate::run(args, cli.config.as_deref()).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
