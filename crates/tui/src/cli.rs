//! Command-line argument parsing for keygrid-tui.
//!
//! Responsibilities:
//! - Define CLI argument structure using clap derive macros.
//! - Provide parsed CLI arguments to the main application.
//!
//! Does NOT handle:
//! - Configuration loading or validation (see `runtime::config`).
//! - Terminal state management (see `runtime::terminal`).
//!
//! Invariants:
//! - CLI arguments are parsed once at startup via `Cli::parse()`.
//! - All path arguments are resolved relative to the current working directory.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for keygrid-tui.
///
/// Configuration precedence (highest to lowest):
/// 1. CLI arguments (e.g., --arrows, --row-wrap)
/// 2. Environment variables (e.g., KEYGRID_MIN_SIMILARITY)
/// 3. Config file (config.json)
/// 4. Default values
#[derive(Debug, Parser)]
#[command(
    name = "keygrid-tui",
    about = "Keyboard-driven grid navigation demo",
    version,
    after_help = "Examples:\n  keygrid-tui\n  keygrid-tui --items 200 --arrows\n  keygrid-tui --config-path ./keygrid.json --log-dir /tmp/keygrid\n"
)]
pub struct Cli {
    /// Path to a custom configuration file
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Number of tiles to show
    #[arg(long, short = 'n', default_value_t = 60)]
    pub items: usize,

    /// Width of a tile in cells
    #[arg(long, default_value_t = 18)]
    pub tile_width: u16,

    /// Use arrow keys instead of WASD for movement
    #[arg(long)]
    pub arrows: bool,

    /// Wrap left/right inside the current row instead of the whole sequence
    #[arg(long)]
    pub row_wrap: bool,
}
