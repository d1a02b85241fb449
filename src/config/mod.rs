// src/config/mod.rs

//! Project file loading and validation for cpmflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a project file from disk (`loader.rs`).
//! - Validate it and flag questionable dependency references (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, ProjectFile, RawProjectFile};
