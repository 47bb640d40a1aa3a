//! Hierarchical hotkey contexts and key event dispatch.
//!
//! Responsibilities:
//! - Keep a registry of named contexts, each with its own bindings and an
//!   optional parent context.
//! - Maintain the activation stack as components mount and unmount.
//! - Match key events (chords, sequences, digit motions and captures) against
//!   the active context and its ancestors, then run the bound handler.
//! - Expose cheat sheet data for the active chain.
//!
//! Does NOT handle:
//! - Trigger string parsing (see `keygrid_config::keybind`).
//! - Reading events from the terminal or rendering anything.
//!
//! Invariants:
//! - A finalized context rejects further registrations.
//! - A child context can only be pushed while its parent is active.
//! - Removing contexts from the stack clears both key histories and discards
//!   a capture owned by a removed context.
//! - Stack requests made by a failing handler are discarded.

mod binding;
mod capture;
mod cheat_sheet;
pub mod chord;
mod context;
mod engine;
mod error;
mod history;

pub use binding::{
    CaptureHandler, Description, Dispatch, EngineRequest, HandlerResult, HotkeyHandler,
    HotkeyInvocation, HotkeyMatch, HotkeyOptions, HotkeyRegistration, KeyMode, NULL_DESCRIPTION,
    nullish_handler,
};
pub use capture::{Capture, CaptureState};
pub use cheat_sheet::{CheatSheetEntry, CheatSheetGroup};
pub use context::{ActionId, ActionRegistration, ContextId, OverrideBehavior, WrapOrder};
pub use engine::{HotkeyEngine, KeyOutcome, TriggerRecord};
pub use error::HotkeyError;
