// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::Result;

/// Load a project file and return the raw, unvalidated model.
///
/// Only TOML deserialization happens here. Use [`load_and_validate`] for the
/// checked [`ProjectFile`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawProjectFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), tasks = raw.task.len(), "project file parsed");

    Ok(raw)
}

/// Load a project file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks task ids, titles, date ranges and `[config]` sanity.
/// - Flags dangling/self dependency references and cycles (warnings, or
///   errors with `strict_dependencies = true`).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectFile> {
    let raw = load_from_path(&path)?;
    ProjectFile::try_from(raw)
}

/// Default project file: `Project.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Project.toml")
}
