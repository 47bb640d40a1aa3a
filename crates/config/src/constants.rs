//! Centralized constants for the keygrid workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Key History & Timing
// =============================================================================

/// Maximum number of key events kept per history (keydown / keyup).
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Upper bound accepted for a configured history capacity.
pub const MAX_HISTORY_CAPACITY: usize = 1000;

/// Number of triggered hotkeys remembered for inspection.
pub const MAX_TRIGGERED_HISTORY: usize = 10;

/// Maximum delay between two keystrokes of one sequence in milliseconds.
/// Only enforced for bindings that opt in with `consider_time_in_sequence`.
pub const DEFAULT_SEQUENCE_TIMEOUT_MS: u64 = 1200;

/// Minimum delay between two repeated executions of the same hotkey.
pub const DEFAULT_REPEAT_INTERVAL_MS: u64 = 130;

// =============================================================================
// Triggers
// =============================================================================

/// Terminator that accepts a `\s` capture when none is written.
pub const DEFAULT_CAPTURE_ACCEPT: &str = "enter";

/// Terminator that cancels any capture.
pub const DEFAULT_CAPTURE_CANCEL: &str = "esc";

/// Metakey matching one or more digits (vim-style motion).
pub const DIGITS_METAKEY: &str = "\\d";

/// Metakey matching any single letter, either case.
pub const LETTER_METAKEY: &str = "\\l";

/// Metakey capturing a free-form string until a terminator.
pub const STRING_METAKEY: &str = "\\s";

/// Metakey capturing exactly one character.
pub const CHAR_METAKEY: &str = "\\c";

// =============================================================================
// Descriptions
// =============================================================================

/// Group used for bindings that never appear in a cheat sheet.
pub const HIDDEN_GROUP: &str = "hidden";

/// Group assigned to descriptions without a `<group>` label.
pub const GENERAL_GROUP: &str = "general";

/// Description assigned when a binding declares none.
pub const DEFAULT_DESCRIPTION: &str = "<general>No information available";

// =============================================================================
// Search Defaults
// =============================================================================

/// Minimum Jaro-Winkler similarity for a candidate to be kept.
pub const DEFAULT_MINIMUM_SIMILARITY: f64 = 0.5;

/// Queries longer than this use similarity ranking.
pub const SIMILARITY_QUERY_MIN_LEN: usize = 4;

/// Candidate/query length ratio above which token scoring applies.
pub const MEMBER_SIMILARITY_RATIO: f64 = 1.5;

/// Tokens shorter than this fraction of the query are not scored.
pub const MEMBER_MIN_TOKEN_RATIO: f64 = 0.7;

/// Per-character bonus applied by exact inclusion boosting.
pub const EXACT_INCLUSION_BOOST: f64 = 0.1;

// =============================================================================
// Grid Defaults
// =============================================================================

/// Maximum vertical distance (in cells) for two items to share a row.
pub const DEFAULT_ROW_TOLERANCE: u16 = 0;

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_MIN_SIMILARITY: &str = "KEYGRID_MIN_SIMILARITY";
pub const ENV_CASE_SENSITIVE: &str = "KEYGRID_CASE_SENSITIVE";
pub const ENV_BOOST_EXACT_INCLUSION: &str = "KEYGRID_BOOST_EXACT_INCLUSION";
pub const ENV_MEMBER_SIMILARITY: &str = "KEYGRID_MEMBER_SIMILARITY";
pub const ENV_SEQUENCE_TIMEOUT_MS: &str = "KEYGRID_SEQUENCE_TIMEOUT_MS";
pub const ENV_REPEAT_INTERVAL_MS: &str = "KEYGRID_REPEAT_INTERVAL_MS";
pub const ENV_HISTORY_CAPACITY: &str = "KEYGRID_HISTORY_CAPACITY";
pub const ENV_ROW_TOLERANCE: &str = "KEYGRID_ROW_TOLERANCE";
pub const ENV_CONFIG_PATH: &str = "KEYGRID_CONFIG_PATH";
