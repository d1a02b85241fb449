// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;

/// Command-line arguments for `cpmflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cpmflow",
    version,
    about = "Compute and follow the critical path of a dependent task set.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    ///
    /// Default: `Project.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Project.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Overrides `CPMFLOW_LOG`, which takes full filter directives.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print tasks and dependencies, but don't solve.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the schedule as a `schedule_updated` JSON event.
    #[arg(long)]
    pub json: bool,

    /// Keep running: read JSON-line commands from stdin and stream every
    /// event as a JSON line on stdout.
    #[arg(long, conflicts_with = "dry_run")]
    pub follow: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
