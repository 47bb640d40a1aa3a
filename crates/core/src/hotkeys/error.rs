//! Hotkey configuration errors.

use keygrid_config::KeybindError;
use thiserror::Error;

use super::context::ContextId;

/// Errors raised while declaring contexts and bindings or changing the
/// activation stack.
///
/// These are programming or configuration mistakes and surface immediately.
/// Runtime lookup misses are logged and answered with a no-op instead.
#[derive(Debug, Error, PartialEq)]
pub enum HotkeyError {
    /// Registration on a context that has been finalized.
    #[error("Hotkey context '{context}' is final and cannot be modified")]
    ContextFinalized {
        /// Context name
        context: String,
    },

    /// The same action registered twice without an override behavior.
    #[error("Action '{action}' is already registered in context '{context}'")]
    DuplicateAction {
        /// Context name
        context: String,
        /// Action identifier
        action: String,
    },

    /// A binding without any trigger.
    #[error("A binding in context '{context}' has no triggers")]
    NoTriggers {
        /// Context name
        context: String,
    },

    /// Registration against a context that does not exist.
    #[error("Unknown hotkey context {id}")]
    UnknownContext {
        /// The unresolved identifier
        id: ContextId,
    },

    /// Pushing a context that is already on the activation stack.
    #[error("Hotkey context '{context}' is already active")]
    AlreadyActive {
        /// Context name
        context: String,
    },

    /// Pushing a child whose parent is not on the activation stack.
    #[error("Hotkey context '{context}' requires its parent '{parent}' to be active")]
    ParentNotActive {
        /// Context name
        context: String,
        /// Parent context name
        parent: String,
    },

    /// A trigger string that does not parse.
    #[error(transparent)]
    InvalidTrigger(#[from] KeybindError),
}
