//! keygrid demo library.
//!
//! A grid of tiles driven entirely by the keygrid hotkey engine: WASD or arrow
//! movement with counts, `/` search with `n`/`N` cycling, item actions that
//! override placeholder bindings and a `?` cheat sheet.

pub mod app;
pub mod cli;
pub mod layout;
pub mod runtime;
pub mod ui;

pub use app::{App, ViewState, demo_items};
pub use layout::TileLayout;
