// src/main.rs

use std::process::ExitCode;

use cpmflow::errors::CpmflowError;
use cpmflow::{cli, logging, run};

/// Exit status for a project file that fails to parse or validate.
const EXIT_BAD_PROJECT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    match run_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cpmflow error: {err:?}");
            match err.downcast_ref::<CpmflowError>() {
                Some(CpmflowError::ConfigError(_) | CpmflowError::TomlError(_)) => {
                    ExitCode::from(EXIT_BAD_PROJECT)
                }
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
