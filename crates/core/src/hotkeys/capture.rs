//! Capture sub-mode state machine.
//!
//! A capture trigger (`init \s [terminator]` or `init \c`) switches the engine
//! from chord matching to text accumulation. The machine is driven one key
//! event at a time; it never suspends.

use crossterm::event::{KeyCode, KeyEvent};
use keygrid_config::keybind::CaptureSpec;

use super::chord::{chord_matches, typed_char};
use super::context::ContextId;

/// An in-progress capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    owner: ContextId,
    pub(crate) binding: usize,
    trigger: String,
    spec: CaptureSpec,
    buffer: String,
}

impl Capture {
    pub(crate) fn new(owner: ContextId, binding: usize, trigger: String, spec: CaptureSpec) -> Self {
        Self {
            owner,
            binding,
            trigger,
            spec,
            buffer: String::new(),
        }
    }

    /// Context owning the capturing binding.
    pub fn owner(&self) -> ContextId {
        self.owner
    }

    /// The capture trigger that started accumulation.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Text typed so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Apply one key event.
    pub(crate) fn feed(&mut self, event: &KeyEvent) -> CaptureStep {
        if chord_matches(&self.spec.cancel, event) {
            return CaptureStep::Cancelled;
        }
        if chord_matches(&self.spec.accept, event) {
            return CaptureStep::Accepted(std::mem::take(&mut self.buffer));
        }

        if event.code == KeyCode::Backspace {
            self.buffer.pop();
            return CaptureStep::Updated;
        }

        let Some(c) = typed_char(event) else {
            return CaptureStep::Ignored;
        };
        self.buffer.push(c);
        match self.spec.max_len() {
            Some(max) if self.buffer.chars().count() >= max => {
                CaptureStep::Accepted(std::mem::take(&mut self.buffer))
            }
            _ => CaptureStep::Updated,
        }
    }
}

/// Result of feeding one key to a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CaptureStep {
    /// The buffer changed.
    Updated,
    /// The capture completed with this text.
    Accepted(String),
    /// The cancel terminator was pressed.
    Cancelled,
    /// The key neither types nor terminates.
    Ignored,
}

/// Capture sub-mode of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Keys are matched as chords.
    #[default]
    Idle,
    /// Keys accumulate into the capture buffer.
    Accumulating(Capture),
    /// A completed capture's handler is running.
    Dispatching,
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn capture(&self) -> Option<&Capture> {
        match self {
            Self::Accumulating(capture) => Some(capture),
            _ => None,
        }
    }
}
