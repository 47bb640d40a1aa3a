//! Grid navigation over visually laid out items.
//!
//! Responsibilities:
//! - Infer rows from item rectangles supplied by a `LayoutProvider`.
//! - Move a cursor in two dimensions over the one-dimensional item sequence.
//! - Re-query the layout on explicit refresh or container change.
//!
//! Does NOT handle:
//! - Hotkey bindings for movement (see `wrappers::cursor`).
//! - Rendering or scrolling the items.
//!
//! Invariants:
//! - Rows are clustered by top edge only; declared widths are ignored.
//! - Every movement keeps the cursor inside `[0, len)`; an empty grid yields `None`.
//! - Up/down and left/right are exact inverses of each other.

mod layout;
mod navigation;
mod wrapper;

pub use layout::{LayoutError, LayoutProvider, infer_rows};
pub use navigation::{CursorPosition, GridNavigation, HorizontalWrap};
pub use wrapper::{GridNavigationWrapper, SharedGrid};
