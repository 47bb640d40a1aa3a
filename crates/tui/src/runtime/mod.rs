//! Runtime plumbing for the demo binary: configuration loading and terminal
//! restoration.

pub mod config;
pub mod terminal;

/// Capacity of the terminal event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Redraw interval when no input arrives.
pub const UI_TICK_MS: u64 = 250;
