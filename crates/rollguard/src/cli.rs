//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// rollguard - canary rollback decisions
#[derive(Parser, Debug)]
#[command(name = "rollguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors; verdicts and command output still print
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to rollguard.yaml config file
    #[arg(short, long, global = true, env = "ROLLGUARD_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Decide on rollback for a single observation given on the command line
    Evaluate(EvaluateArgs),

    /// Fetch an observation with retry and decide on rollback
    Gate(GateArgs),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate(ConfigValidateArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigValidateArgs {
    /// Config file to validate (defaults to --config or a search from cwd)
    #[arg(short, long)]
    pub file: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Evaluate command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Observed p95 latency in milliseconds
    #[arg(long = "p95-ms")]
    pub p95_ms: f64,

    /// Observed error rate as a fraction in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    pub error_rate: f64,

    /// Override the configured p95 threshold (milliseconds)
    #[arg(long)]
    pub threshold_ms: Option<f64>,

    /// Override the configured error-rate threshold (fraction)
    #[arg(long)]
    pub error_rate_threshold: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Gate command
#[derive(Args, Debug)]
pub struct GateArgs {
    /// JSON file holding {"p95_latency_ms": .., "error_rate": ..}
    #[arg(long)]
    pub metrics_file: Utf8PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
