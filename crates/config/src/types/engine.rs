//! Top-level engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::keybind::ActionTriggers;
use super::navigation::{MovementTriggers, SearchTriggers};
use super::search::SearchOptions;
use crate::constants::{
    DEFAULT_HISTORY_CAPACITY, DEFAULT_REPEAT_INTERVAL_MS, DEFAULT_ROW_TOLERANCE,
    DEFAULT_SEQUENCE_TIMEOUT_MS,
};

/// Timing and buffering knobs for the hotkey engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyTiming {
    /// Maximum delay between keystrokes of a time-sensitive sequence.
    pub sequence_timeout_ms: u64,
    /// Minimum delay between two repeated executions of a repeatable hotkey.
    pub repeat_interval_ms: u64,
    /// Key events kept per history.
    pub history_capacity: usize,
}

impl Default for HotkeyTiming {
    fn default() -> Self {
        Self {
            sequence_timeout_ms: DEFAULT_SEQUENCE_TIMEOUT_MS,
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl HotkeyTiming {
    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }
}

/// Grid layout inference settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Items whose top edges differ by at most this many cells share a row.
    pub row_tolerance: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_tolerance: DEFAULT_ROW_TOLERANCE,
        }
    }
}

/// Everything the loader resolves from defaults, the config file and the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchOptions,
    pub hotkeys: HotkeyTiming,
    pub grid: GridConfig,
    pub movement: MovementTriggers,
    pub search_triggers: SearchTriggers,
    pub actions: ActionTriggers,
}
