//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Support loading from environment variables, the config file, and direct builder methods.
//! - Validate and build the final `EngineConfig`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Config file loading logic (delegated to file.rs).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over config file values.
//! - Builder methods called after `from_env()` take precedence over environment variables.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use super::file::apply_file;
use crate::constants::MAX_HISTORY_CAPACITY;
use crate::keybind::validate_action_triggers;
use crate::types::EngineConfig;

/// Configuration loader that builds an `EngineConfig` from files and the environment.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file_config: Option<EngineConfig>,
    config_path: Option<PathBuf>,
    minimum_similarity: Option<f64>,
    case_sensitive: Option<bool>,
    boost_exact_inclusion: Option<bool>,
    member_similarity: Option<bool>,
    sequence_timeout_ms: Option<u64>,
    repeat_interval_ms: Option<u64>,
    history_capacity: Option<usize>,
    row_tolerance: Option<u16>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Override the config file path.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Read the JSON config file.
    ///
    /// Uses the builder path, then `KEYGRID_CONFIG_PATH`, then the platform default.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        apply_file(&mut self)?;
        Ok(self)
    }

    /// Read configuration from environment variables.
    ///
    /// Environment variables take precedence over config file settings.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the minimum similarity for ranked search.
    pub fn with_minimum_similarity(mut self, value: f64) -> Self {
        self.minimum_similarity = Some(value);
        self
    }

    /// Set whether search compares case-sensitively.
    pub fn with_case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = Some(value);
        self
    }

    /// Set the maximum delay between keystrokes of a time-sensitive sequence.
    pub fn with_sequence_timeout(mut self, timeout: Duration) -> Self {
        self.sequence_timeout_ms = Some(duration_millis(timeout));
        self
    }

    /// Set the minimum delay between repeated executions.
    pub fn with_repeat_interval(mut self, interval: Duration) -> Self {
        self.repeat_interval_ms = Some(duration_millis(interval));
        self
    }

    /// Set the number of key events kept per history.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    /// Set the row clustering tolerance in cells.
    pub fn with_row_tolerance(mut self, tolerance: u16) -> Self {
        self.row_tolerance = Some(tolerance);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let mut config = self.file_config.unwrap_or_default();

        if let Some(value) = self.minimum_similarity {
            config.search.minimum_similarity = value;
        }
        if let Some(value) = self.case_sensitive {
            config.search.case_sensitive = value;
        }
        if let Some(value) = self.boost_exact_inclusion {
            config.search.boost_exact_inclusion = value;
        }
        if let Some(value) = self.member_similarity {
            config.search.member_similarity = value;
        }
        if let Some(value) = self.sequence_timeout_ms {
            config.hotkeys.sequence_timeout_ms = value;
        }
        if let Some(value) = self.repeat_interval_ms {
            config.hotkeys.repeat_interval_ms = value;
        }
        if let Some(value) = self.history_capacity {
            config.hotkeys.history_capacity = value;
        }
        if let Some(value) = self.row_tolerance {
            config.grid.row_tolerance = value;
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validates the merged configuration.
    ///
    /// Checks:
    /// - minimum similarity is within [0.0, 1.0]
    /// - history capacity is within 1..=MAX_HISTORY_CAPACITY
    /// - every configured trigger parses and action triggers do not conflict
    fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
        let similarity = config.search.minimum_similarity;
        if !(0.0..=1.0).contains(&similarity) {
            return Err(ConfigError::InvalidSimilarity { value: similarity });
        }

        let capacity = config.hotkeys.history_capacity;
        if capacity == 0 || capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::InvalidHistoryCapacity {
                value: capacity,
                max: MAX_HISTORY_CAPACITY,
            });
        }

        config.movement.validate()?;
        config.search_triggers.validate()?;
        validate_action_triggers(&config.actions.resolved())?;
        Ok(())
    }

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn set_file_config(&mut self, config: EngineConfig) {
        self.file_config = Some(config);
    }

    pub(crate) fn set_minimum_similarity(&mut self, value: f64) {
        self.minimum_similarity = Some(value);
    }

    pub(crate) fn set_case_sensitive(&mut self, value: bool) {
        self.case_sensitive = Some(value);
    }

    pub(crate) fn set_boost_exact_inclusion(&mut self, value: bool) {
        self.boost_exact_inclusion = Some(value);
    }

    pub(crate) fn set_member_similarity(&mut self, value: bool) {
        self.member_similarity = Some(value);
    }

    pub(crate) fn set_sequence_timeout_ms(&mut self, value: u64) {
        self.sequence_timeout_ms = Some(value);
    }

    pub(crate) fn set_repeat_interval_ms(&mut self, value: u64) {
        self.repeat_interval_ms = Some(value);
    }

    pub(crate) fn set_history_capacity(&mut self, value: usize) {
        self.history_capacity = Some(value);
    }

    pub(crate) fn set_row_tolerance(&mut self, value: u16) {
        self.row_tolerance = Some(value);
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
