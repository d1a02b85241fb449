// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::TaskId;

#[derive(Error, Debug)]
pub enum CpmflowError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// The record store failed; nothing was published for this request.
    #[error("Store access failed: {0:#}")]
    Store(#[source] anyhow::Error),

    #[error("Schedule engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CpmflowError>;
