//! Bounded key history and sequence matching.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use keygrid_config::keybind::ChordMatcher;

use super::chord::{chord_matches, digit_of, letter_of};

#[derive(Debug, Clone)]
struct Stamped {
    event: KeyEvent,
    at: Instant,
}

/// The most recent key events of one key mode, oldest first.
#[derive(Debug, Clone)]
pub(crate) struct KeyHistory {
    events: VecDeque<Stamped>,
    capacity: usize,
}

impl KeyHistory {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn record(&mut self, event: KeyEvent, at: Instant) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(Stamped { event, at });
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    /// Match `fragments` against the newest events.
    ///
    /// Walks backwards from the newest event: each literal or `\l` consumes
    /// one event, each `\d` consumes every consecutive digit. With a `timeout`, adjacent
    /// consumed events must be at most that far apart. Returns the motion
    /// counts in written order.
    pub(crate) fn match_sequence(
        &self,
        fragments: &[ChordMatcher],
        timeout: Option<Duration>,
    ) -> Option<Vec<u64>> {
        let mut events = self.events.iter().rev().peekable();
        let mut motions = Vec::new();
        let mut newer: Option<Instant> = None;

        let mut in_time = |at: Instant| {
            let ok = match (timeout, newer) {
                (Some(limit), Some(newer)) => newer.saturating_duration_since(at) <= limit,
                _ => true,
            };
            newer = Some(at);
            ok
        };

        for fragment in fragments.iter().rev() {
            match fragment {
                ChordMatcher::Literal(key) => {
                    let stamped = events.next()?;
                    if !chord_matches(key, &stamped.event) || !in_time(stamped.at) {
                        return None;
                    }
                }
                ChordMatcher::Letter => {
                    let stamped = events.next()?;
                    if letter_of(&stamped.event).is_none() || !in_time(stamped.at) {
                        return None;
                    }
                }
                ChordMatcher::Digits => {
                    let mut digits = Vec::new();
                    while let Some(stamped) = events.peek() {
                        let Some(digit) = digit_of(&stamped.event) else {
                            break;
                        };
                        if !in_time(stamped.at) {
                            break;
                        }
                        digits.push(digit);
                        events.next();
                    }
                    if digits.is_empty() {
                        return None;
                    }
                    let count = digits
                        .iter()
                        .rev()
                        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(*d)));
                    motions.push(count);
                }
            }
        }

        motions.reverse();
        Some(motions)
    }
}
