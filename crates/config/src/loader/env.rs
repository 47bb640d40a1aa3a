//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `KEYGRID_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Loading from the config file (see file.rs).
//! - Building the final config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Environment variables take precedence over config file settings.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Unparseable values return ConfigError::InvalidValue.

use std::str::FromStr;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::{
    ENV_BOOST_EXACT_INCLUSION, ENV_CASE_SENSITIVE, ENV_HISTORY_CAPACITY, ENV_MEMBER_SIMILARITY,
    ENV_MIN_SIMILARITY, ENV_REPEAT_INTERVAL_MS, ENV_ROW_TOLERANCE, ENV_SEQUENCE_TIMEOUT_MS,
};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an environment variable, mapping failures to `InvalidValue`.
fn parse_env<T: FromStr>(var: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(var)
        .map(|raw| {
            raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                message: expected.to_string(),
            })
        })
        .transpose()
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(value) = parse_env(ENV_MIN_SIMILARITY, "must be a number")? {
        loader.set_minimum_similarity(value);
    }
    if let Some(value) = parse_env(ENV_CASE_SENSITIVE, "must be true or false")? {
        loader.set_case_sensitive(value);
    }
    if let Some(value) = parse_env(ENV_BOOST_EXACT_INCLUSION, "must be true or false")? {
        loader.set_boost_exact_inclusion(value);
    }
    if let Some(value) = parse_env(ENV_MEMBER_SIMILARITY, "must be true or false")? {
        loader.set_member_similarity(value);
    }
    if let Some(value) = parse_env(ENV_SEQUENCE_TIMEOUT_MS, "must be a number of milliseconds")? {
        loader.set_sequence_timeout_ms(value);
    }
    if let Some(value) = parse_env(ENV_REPEAT_INTERVAL_MS, "must be a number of milliseconds")? {
        loader.set_repeat_interval_ms(value);
    }
    if let Some(value) = parse_env(ENV_HISTORY_CAPACITY, "must be a positive integer")? {
        loader.set_history_capacity(value);
    }
    if let Some(value) = parse_env(ENV_ROW_TOLERANCE, "must be a non-negative integer")? {
        loader.set_row_tolerance(value);
    }
    Ok(())
}
