//! Stateful search over an owned pool with a cyclic result cursor.

use std::fmt;
use std::fmt::Display;

use keygrid_config::SearchOptions;

use super::search_indices;

type TextFn<T> = Box<dyn Fn(&T) -> String>;

/// A pool of items, the matches of the last query and a cursor into them.
///
/// Every [`search`](Self::search) replaces the matches and resets the cursor
/// to the first match; only [`next_match`](Self::next_match) and
/// [`previous_match`](Self::previous_match) move it, wrapping at both ends.
pub struct SearchResults<T> {
    pool: Vec<T>,
    matches: Vec<usize>,
    cursor: usize,
    query: String,
    options: SearchOptions,
    to_text: TextFn<T>,
}

impl<T: Display> SearchResults<T> {
    /// Search `pool` by each item's `Display` form.
    pub fn new(pool: Vec<T>, options: SearchOptions) -> Self {
        Self::with_text(pool, options, |item: &T| item.to_string())
    }
}

impl<T> SearchResults<T> {
    /// Search `pool` through a custom stringification.
    pub fn with_text<F>(pool: Vec<T>, options: SearchOptions, to_text: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        Self {
            pool,
            matches: Vec::new(),
            cursor: 0,
            query: String::new(),
            options,
            to_text: Box::new(to_text),
        }
    }

    /// Replace the pool. Previous matches refer to the old pool and are dropped.
    pub fn set_pool(&mut self, pool: Vec<T>) {
        self.pool = pool;
        self.clear();
    }

    pub fn pool(&self) -> &[T] {
        &self.pool
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: SearchOptions) {
        self.options = options;
    }

    /// Run a new search, returning the number of matches.
    pub fn search(&mut self, query: &str) -> usize {
        self.matches = search_indices(&self.pool, query, &self.options, &self.to_text);
        self.cursor = 0;
        self.query = query.to_string();
        tracing::debug!(query, matches = self.matches.len(), "Search completed");
        self.matches.len()
    }

    /// Forget the last query and its matches.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.cursor = 0;
        self.query.clear();
    }

    /// The last query, empty after `clear`.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Position of the cursor within the matches.
    pub fn position(&self) -> Option<usize> {
        (!self.matches.is_empty()).then_some(self.cursor)
    }

    /// Pool index of the match under the cursor.
    pub fn current_index(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    /// Item under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.current_index().map(|index| &self.pool[index])
    }

    /// Pool indices of all matches, best first.
    pub fn match_indices(&self) -> &[usize] {
        &self.matches
    }

    /// Move the cursor to an absolute match position. Out of range is rejected.
    pub fn set_position(&mut self, position: usize) -> bool {
        if position < self.matches.len() {
            self.cursor = position;
            true
        } else {
            false
        }
    }

    /// Move the cursor by `step` matches, wrapping at both ends.
    pub fn step(&mut self, step: i64) -> Option<&T> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len() as i64;
        self.cursor = (self.cursor as i64 + step).rem_euclid(len) as usize;
        self.current()
    }

    pub fn next_match(&mut self) -> Option<&T> {
        self.step(1)
    }

    pub fn previous_match(&mut self) -> Option<&T> {
        self.step(-1)
    }
}

impl<T: fmt::Debug> fmt::Debug for SearchResults<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResults")
            .field("pool", &self.pool)
            .field("matches", &self.matches)
            .field("cursor", &self.cursor)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
