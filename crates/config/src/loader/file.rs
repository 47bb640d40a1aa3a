//! JSON config file loading.
//!
//! Responsibilities:
//! - Resolve the config file path (builder, `KEYGRID_CONFIG_PATH`, platform default).
//! - Read and deserialize the file into an `EngineConfig`.
//!
//! Does NOT handle:
//! - Environment variable overrides (see env.rs).
//! - Validation of the merged result (see builder.rs).
//!
//! Invariants:
//! - A missing file at the platform default path is not an error.
//! - A missing file at an explicitly requested path is an error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::builder::ConfigLoader;
use super::env::env_var_or_none;
use super::error::ConfigError;
use crate::constants::ENV_CONFIG_PATH;
use crate::types::EngineConfig;

/// Platform config path, e.g. `~/.config/keygrid/config.json` on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("", "", "keygrid")
        .map(|dirs| dirs.config_dir().join("config.json"))
        .ok_or_else(|| ConfigError::ConfigDirUnavailable("no home directory".to_string()))
}

/// Apply the config file to the loader.
pub fn apply_file(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    let explicit = loader
        .config_path()
        .cloned()
        .or_else(|| env_var_or_none(ENV_CONFIG_PATH).map(PathBuf::from));

    let (path, required) = match explicit {
        Some(path) => (path, true),
        None => (default_config_path()?, false),
    };

    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(());
    }

    let config = read_config_file(&path)?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    loader.set_file_config(config);
    Ok(())
}

/// Read and parse a config file.
pub fn read_config_file(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        source,
    })
}
