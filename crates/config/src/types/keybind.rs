//! Shared hotkey action types.
//!
//! Responsibilities:
//! - Define the actions every item-oriented component family exposes (`HotkeyAction`).
//! - Define `ActionTriggers`, the user-overridable trigger table for those actions.
//!
//! Does NOT handle:
//! - Trigger parsing or validation (see `keybind` module at crate root).
//! - Runtime key event matching (see core crate).
//!
//! Invariants:
//! - `HotkeyAction` uses snake_case serialization for config file consistency.
//! - `ActionTriggers` uses `BTreeMap` for deterministic serialization.
//! - Only actions explicitly listed in overrides replace the default triggers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An action identifier shared by item-oriented components.
///
/// Components register placeholder bindings for these and concrete usages
/// keep, replace or wrap them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyAction {
    /// Leave the current hotkey context
    QuitContext,
    /// Show or hide the cheat sheet
    ToggleCheatSheet,
    /// Select the focused item
    ItemSelection,
    /// Mark the focused item for deletion
    ItemDeletion,
    /// Rename the focused item
    ItemRenaming,
    /// Copy the focused item
    ItemYanking,
    /// Switch the active register
    RegisterChange,
}

impl HotkeyAction {
    /// Every action, in declaration order.
    pub const ALL: [HotkeyAction; 7] = [
        Self::QuitContext,
        Self::ToggleCheatSheet,
        Self::ItemSelection,
        Self::ItemDeletion,
        Self::ItemRenaming,
        Self::ItemYanking,
        Self::RegisterChange,
    ];

    /// Built-in triggers for this action.
    pub fn default_triggers(self) -> &'static [&'static str] {
        match self {
            Self::QuitContext => &["q"],
            Self::ToggleCheatSheet => &["?"],
            Self::ItemSelection => &["e"],
            Self::ItemDeletion => &["x"],
            Self::ItemRenaming => &["c c"],
            Self::ItemYanking => &["y y"],
            Self::RegisterChange => &["` \\c"],
        }
    }
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuitContext => write!(f, "quit_context"),
            Self::ToggleCheatSheet => write!(f, "toggle_cheat_sheet"),
            Self::ItemSelection => write!(f, "item_selection"),
            Self::ItemDeletion => write!(f, "item_deletion"),
            Self::ItemRenaming => write!(f, "item_renaming"),
            Self::ItemYanking => write!(f, "item_yanking"),
            Self::RegisterChange => write!(f, "register_change"),
        }
    }
}

/// User-defined trigger overrides for [`HotkeyAction`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionTriggers {
    /// Map of action -> trigger strings.
    #[serde(default)]
    pub overrides: BTreeMap<HotkeyAction, Vec<String>>,
}

impl ActionTriggers {
    /// Returns true if there are no overrides configured.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Triggers for `action`: the override when present, the defaults otherwise.
    pub fn triggers_for(&self, action: HotkeyAction) -> Vec<String> {
        match self.overrides.get(&action) {
            Some(triggers) => triggers.clone(),
            None => action
                .default_triggers()
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }

    /// The complete table with defaults filled in.
    pub fn resolved(&self) -> BTreeMap<HotkeyAction, Vec<String>> {
        HotkeyAction::ALL
            .iter()
            .map(|action| (*action, self.triggers_for(*action)))
            .collect()
    }
}
