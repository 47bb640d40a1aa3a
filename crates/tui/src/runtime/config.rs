//! Configuration loading for the demo.
//!
//! Responsibilities:
//! - Load the engine configuration with file and environment overrides.
//! - Apply the CLI movement preset.
//!
//! Does NOT handle:
//! - Terminal state management (see `runtime::terminal`).
//!
//! Invariants:
//! - Configuration precedence: CLI args > env vars > config file > defaults.
//! - `load_dotenv()` is called before loading configuration.

use anyhow::{Context, Result};
use keygrid_config::{ConfigLoader, EngineConfig, MovementTriggers};

use crate::cli::Cli;

/// Build the engine configuration for this run.
///
/// # Errors
///
/// Fails when the `.env` file, the config file or an environment variable is
/// invalid.
pub fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut loader = ConfigLoader::new()
        .load_dotenv()
        .context("Failed to load .env file")?;
    if let Some(path) = &cli.config_path {
        loader = loader.with_config_path(path.clone());
    }

    let mut config = loader
        .from_file()
        .context("Failed to read config file")?
        .from_env()
        .context("Failed to apply environment overrides")?
        .build()
        .context("Invalid configuration")?;

    if cli.arrows {
        config.movement = MovementTriggers::arrows();
    }
    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("keygrid-tui").chain(args.iter().copied()))
    }

    #[test]
    #[serial]
    fn test_file_then_env_then_cli() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keygrid.json");
        std::fs::write(
            &path,
            r#"{"search": {"minimum_similarity": 0.8}, "movement": {"up": "k"}}"#,
        )
        .unwrap();
        let path = path.to_string_lossy().into_owned();

        temp_env::with_vars(
            [
                ("DOTENV_DISABLED", Some("1")),
                ("KEYGRID_CONFIG_PATH", None),
                ("KEYGRID_MIN_SIMILARITY", None),
                ("KEYGRID_CASE_SENSITIVE", Some("true")),
            ],
            || {
                let config = load_config(&cli(&["--config-path", &path])).unwrap();
                assert_eq!(config.search.minimum_similarity, 0.8);
                assert!(config.search.case_sensitive);
                assert_eq!(config.movement.up, "k");

                let config = load_config(&cli(&["--config-path", &path, "--arrows"])).unwrap();
                assert_eq!(config.movement, MovementTriggers::arrows());
            },
        );
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");
        let path = path.to_string_lossy().into_owned();

        temp_env::with_vars([("DOTENV_DISABLED", Some("1"))], || {
            let err = load_config(&cli(&["--config-path", &path])).unwrap_err();
            assert!(err.to_string().contains("config file"));
        });
    }
}
