// src/logging.rs

//! Logging setup for `cpmflow`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (applies to every target)
//! 2. `CPMFLOW_LOG`, in `EnvFilter` directive syntax, e.g. `debug` or
//!    `cpmflow::notify=trace,info`
//! 3. `info`
//!
//! Output goes to stderr; stdout is reserved for schedules and session
//! events.

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "CPMFLOW_LOG";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Resolve the active filter from the CLI flag and the raw `CPMFLOW_LOG`
/// value.
///
/// A malformed `CPMFLOW_LOG` is an error rather than a silent fallback.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::default().add_directive(LevelFilter::from(level).into()));
    }

    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV_VAR} value '{directives}'")),
        None => Ok(EnvFilter::default().add_directive(LevelFilter::INFO.into())),
    }
}
