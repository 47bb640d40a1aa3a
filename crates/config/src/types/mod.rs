//! Configuration type definitions for keygrid.
//!
//! Responsibilities:
//! - Define option types for search, hotkey timing, grid inference and trigger tables.
//! - Ensure consistent defaults so partial config files deserialize.
//!
//! Does NOT handle:
//! - Configuration loading from files or environment variables (see `loader` module).
//! - Trigger parsing or validation (see `keybind` module at crate root).
//!
//! Invariants:
//! - Every struct uses `#[serde(default)]`; missing fields take the built-in value.

mod engine;
pub mod keybind;
mod navigation;
mod search;

pub use engine::{EngineConfig, GridConfig, HotkeyTiming};
pub use keybind::{ActionTriggers, HotkeyAction};
pub use navigation::{MovementTriggers, SearchTriggers};
pub use search::SearchOptions;
