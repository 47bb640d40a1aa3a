//! Hotkey bindings for grid movement and search.
//!
//! Responsibilities:
//! - Register cursor movement bindings over a shared [`GridNavigation`](crate::grid::GridNavigation).
//! - Register search capture and next/previous bindings over [`SearchResults`](crate::search::SearchResults).
//! - Offer the cheat sheet toggle binding.
//!
//! Does NOT handle:
//! - Deciding whether a move is allowed; callers answer with [`MoveVerdict`].
//! - Rendering.
//!
//! Invariants:
//! - A rejected move or search restores the exact prior cursor state.
//! - An empty trigger in the trigger tables disables that binding.

mod cursor;
mod search;

use thiserror::Error;

use crate::hotkeys::{
    ActionId, ActionRegistration, ContextId, Dispatch, HotkeyEngine, HotkeyError, HotkeyOptions,
    HotkeyRegistration,
};

pub use cursor::CursorMovement;
pub use search::{SearchHotkeys, SearchUpdate};

/// Description used by [`show_cheat_sheet`].
pub const CHEAT_SHEET_DESCRIPTION: &str = "<general>Show keyboard shortcuts";

/// Answer of a position callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveVerdict {
    #[default]
    Accept,
    /// Undo the move.
    Reject,
}

/// Errors raised while registering wrapper bindings.
#[derive(Debug, Error, PartialEq)]
pub enum WrapperError {
    #[error(transparent)]
    Hotkey(#[from] HotkeyError),

    /// The requested initial cursor does not exist.
    #[error("initial cursor {index} is out of bounds for {len} items")]
    CursorOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of items in the grid.
        len: usize,
    },
}

/// Register `action` in `context` to call `toggle` on each of `triggers`.
pub fn show_cheat_sheet<A, I, S, F>(
    engine: &mut HotkeyEngine<A>,
    context: ContextId,
    action: A,
    triggers: I,
    mut toggle: F,
) -> Result<(), HotkeyError>
where
    A: ActionId,
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: FnMut() + 'static,
{
    let registration = HotkeyRegistration::new(triggers, move |_| {
        toggle();
        Ok(Dispatch::Done)
    })
    .options(HotkeyOptions::new().description(CHEAT_SHEET_DESCRIPTION));
    engine.register_action(context, action, ActionRegistration::new(registration))
}
