//! Test helpers for demo application tests.
//!
//! Provides key event constructors and an app laid out in a fixed terminal.

#![allow(dead_code)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use keygrid_config::EngineConfig;
use keygrid_core::HorizontalWrap;
use keygrid_tui::{App, demo_items};
use ratatui::layout::Rect;

/// Terminal size giving three 10-cell tiles per row.
pub const TERMINAL: Rect = Rect {
    x: 0,
    y: 0,
    width: 32,
    height: 20,
};

/// Create a character key event.
pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

/// Create a Shift+char key event as terminals report it.
pub fn shift_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
}

/// Create an Enter key event.
pub fn enter_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
}

/// Create an Escape key event.
pub fn esc_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
}

/// App over `count` demo items with default configuration.
pub fn app(count: usize) -> App {
    app_with(&EngineConfig::default(), count)
}

/// App over `count` demo items, laid out in [`TERMINAL`].
pub fn app_with(config: &EngineConfig, count: usize) -> App {
    let mut app = App::new(config, demo_items(count), 10, HorizontalWrap::Sequence)
        .expect("app should build");
    app.resize(TERMINAL).expect("tiles should lay out");
    app
}

/// Press every key of `text` in order.
pub async fn type_keys(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(c)).await;
    }
}
