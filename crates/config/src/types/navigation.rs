//! Trigger tables for grid movement and search bindings.
//!
//! Responsibilities:
//! - Define default triggers for cursor movement (`MovementTriggers`).
//! - Define default triggers for search bindings (`SearchTriggers`).
//!
//! Does NOT handle:
//! - Registering the bindings (see `keygrid_core::wrappers`).
//!
//! Invariants:
//! - An empty trigger string disables the corresponding binding.
//! - Finalizers are single keys; the wrappers prepend the `\d` motion.

use serde::{Deserialize, Serialize};

use crate::keybind::{KeybindError, parse_trigger};

/// Triggers for the grid movement bindings (WASD layout by default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTriggers {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    /// Key finishing `<count> <key>` to jump to an item (1-based).
    pub goto_item_finalizer: String,
    /// Key finishing `<count> <key>` to jump to a row (1-based).
    pub goto_row_finalizer: String,
    pub row_start: String,
    pub row_end: String,
    pub first_row: String,
    pub last_row: String,
}

impl Default for MovementTriggers {
    fn default() -> Self {
        Self {
            up: "w".to_string(),
            down: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
            goto_item_finalizer: "g".to_string(),
            goto_row_finalizer: "l".to_string(),
            row_start: "shift+a".to_string(),
            row_end: "shift+d".to_string(),
            first_row: "shift+w".to_string(),
            last_row: "shift+s".to_string(),
        }
    }
}

impl MovementTriggers {
    /// Arrow keys instead of WASD.
    pub fn arrows() -> Self {
        Self {
            up: "up".to_string(),
            down: "down".to_string(),
            left: "left".to_string(),
            right: "right".to_string(),
            row_start: "home".to_string(),
            row_end: "end".to_string(),
            first_row: "pgup".to_string(),
            last_row: "pgdown".to_string(),
            ..Self::default()
        }
    }

    /// Check that every non-empty trigger parses.
    pub fn validate(&self) -> Result<(), KeybindError> {
        let plain = [
            &self.up,
            &self.down,
            &self.left,
            &self.right,
            &self.row_start,
            &self.row_end,
            &self.first_row,
            &self.last_row,
        ];
        for trigger in plain.into_iter().filter(|t| !t.trim().is_empty()) {
            parse_trigger(trigger)?;
        }
        for finalizer in [&self.goto_item_finalizer, &self.goto_row_finalizer]
            .into_iter()
            .filter(|t| !t.trim().is_empty())
        {
            parse_trigger(&format!("\\d {}", finalizer))?;
        }
        Ok(())
    }
}

/// Triggers for the search bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchTriggers {
    /// Key that opens a search capture.
    pub search: String,
    /// Key that accepts the typed query.
    pub accept: String,
    /// Key that moves to the next match.
    pub next: String,
    /// Key that moves to the previous match.
    pub previous: String,
}

impl Default for SearchTriggers {
    fn default() -> Self {
        Self {
            search: "/".to_string(),
            accept: "enter".to_string(),
            next: "n".to_string(),
            previous: "N".to_string(),
        }
    }
}

impl SearchTriggers {
    /// The full capture trigger, `<search> \s <accept>`.
    pub fn capture_trigger(&self) -> String {
        format!("{} \\s {}", self.search.trim(), self.accept.trim())
    }

    /// Check that every non-empty trigger parses.
    pub fn validate(&self) -> Result<(), KeybindError> {
        if !self.search.trim().is_empty() {
            parse_trigger(&self.capture_trigger())?;
        }
        for trigger in [&self.next, &self.previous]
            .into_iter()
            .filter(|t| !t.trim().is_empty())
        {
            parse_trigger(trigger)?;
        }
        Ok(())
    }
}
