//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::ConflictPolicy;
use std::path::PathBuf;

/// linepacer - paste text files line by line at a steady pace
#[derive(Parser, Debug)]
#[command(
    name = "linepacer",
    author,
    version,
    about = "Paste text files line by line at a steady pace",
    long_about = "Pastes text files into configured destinations one line per tick.\n\n\
                  Console commands: paste <file> [delay_ms], stop, resume, cancel, \n\
                  status, help, use <destination>, attach <destination>, \n\
                  detach <destination>, quit."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LINEPACER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "LINEPACER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus metrics port (unset = disabled)
    #[arg(long, global = true, env = "LINEPACER_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive paste console
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); built-in defaults if unset
    #[arg(short, long, env = "LINEPACER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the default delay between lines (ms)
    #[arg(long, env = "LINEPACER_DELAY")]
    pub delay: Option<u64>,

    /// Override what `paste` does when the destination is busy
    #[arg(long, value_enum, env = "LINEPACER_ON_CONFLICT")]
    pub on_conflict: Option<ConflictArg>,

    /// Name of the console context notices are addressed to
    #[arg(long, default_value = "console")]
    pub context: String,

    /// Don't print the session summary on exit
    #[arg(long)]
    pub no_summary: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "linepacer.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

/// Conflict policy as accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ConflictArg {
    /// Refuse to start while a job exists
    Reject,
    /// Cancel the existing job and start the new one
    Replace,
}

impl From<ConflictArg> for ConflictPolicy {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Reject => ConflictPolicy::Reject,
            ConflictArg::Replace => ConflictPolicy::Replace,
        }
    }
}
