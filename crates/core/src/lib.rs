//! Keyboard interaction core for list and grid based terminal UIs.
//!
//! This crate provides a hierarchical hotkey context engine, grid cursor
//! navigation inferred from item rectangles, tiered string search and the
//! wrappers that bind navigation and search to hotkeys.

pub mod grid;
pub mod hotkeys;
pub mod search;
pub mod similarity;
pub mod wrappers;

pub use grid::{
    CursorPosition, GridNavigation, GridNavigationWrapper, HorizontalWrap, LayoutError,
    LayoutProvider, SharedGrid,
};
pub use hotkeys::{
    ActionId, ActionRegistration, ContextId, Dispatch, HotkeyEngine, HotkeyError,
    HotkeyInvocation, HotkeyOptions, HotkeyRegistration, KeyOutcome, OverrideBehavior, WrapOrder,
};
pub use search::{SearchResults, SearchStrategy, search, search_by, similarity_score};
pub use similarity::{jaro, jaro_winkler};
pub use wrappers::{CursorMovement, MoveVerdict, SearchHotkeys, SearchUpdate, WrapperError};
