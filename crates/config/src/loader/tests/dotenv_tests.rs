//! Tests for dotenv loading behavior.
//!
//! Responsibilities:
//! - Test that missing `.env` files are silently ignored.
//! - Test that invalid `.env` files return errors without echoing their content.
//! - Test that `DOTENV_DISABLED=1`/`true` skips dotenv loading.
//!
//! Invariants / Assumptions:
//! - Tests use `env_lock()` to prevent cross-test contamination.
//! - Tests must serialize mutations to process-global state (cwd/env).

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use super::env_lock;
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;

/// RAII guard for temporarily changing the current working directory.
struct CwdGuard {
    original_dir: PathBuf,
}

impl CwdGuard {
    fn new(temp_dir: &TempDir) -> Self {
        let original_dir = std::env::current_dir().expect("Failed to get current directory");
        std::env::set_current_dir(temp_dir.path()).expect("Failed to set current directory");
        Self { original_dir }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original_dir);
    }
}

#[test]
#[serial]
fn test_missing_dotenv_is_ok() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    temp_env::with_var_unset("DOTENV_DISABLED", || {
        let result = ConfigLoader::new().load_dotenv();
        assert!(result.is_ok(), "Missing .env file should be silently ignored");
    });
}

#[test]
#[serial]
fn test_valid_dotenv_feeds_from_env() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    fs::write(
        temp_dir.path().join(".env"),
        "KEYGRID_REPEAT_INTERVAL_MS=75\n",
    )
    .unwrap();

    temp_env::with_vars(
        [
            ("DOTENV_DISABLED", None::<&str>),
            ("KEYGRID_REPEAT_INTERVAL_MS", None),
        ],
        || {
            let config = ConfigLoader::new()
                .load_dotenv()
                .unwrap()
                .from_env()
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(config.hotkeys.repeat_interval_ms, 75);
        },
    );
}

#[test]
#[serial]
fn test_invalid_dotenv_error_hides_content() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    let marker = "unique_marker_value_98765";
    fs::write(
        temp_dir.path().join(".env"),
        format!("KEYGRID_ROW_TOLERANCE={}\nINVALID_LINE_WITHOUT_EQUALS", marker),
    )
    .unwrap();

    temp_env::with_vars(
        [
            ("DOTENV_DISABLED", None::<&str>),
            ("KEYGRID_ROW_TOLERANCE", None),
        ],
        || match ConfigLoader::new().load_dotenv() {
            Err(e @ ConfigError::DotenvParse { .. }) => {
                let message = e.to_string();
                assert!(!message.contains(marker), "leaked: {}", message);
                assert!(message.contains("DOTENV_DISABLED"), "{}", message);
            }
            Err(other) => panic!("Expected DotenvParse error, got {}", other),
            Ok(_) => panic!("Expected DotenvParse error, got Ok"),
        },
    );
}

#[test]
#[serial]
fn test_dotenv_disabled_values() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    for value in ["1", "true"] {
        temp_env::with_var("DOTENV_DISABLED", Some(value), || {
            assert!(
                ConfigLoader::new().load_dotenv().is_ok(),
                "DOTENV_DISABLED={} should skip .env loading",
                value
            );
        });
    }

    temp_env::with_var("DOTENV_DISABLED", Some("false"), || {
        assert!(matches!(
            ConfigLoader::new().load_dotenv(),
            Err(ConfigError::DotenvParse { .. })
        ));
    });
}
