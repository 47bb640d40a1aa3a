//! Two-dimensional cursor over a one-dimensional item sequence.

use ratatui::layout::Rect;

use super::layout::infer_rows;

/// What left/right do at the edge of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalWrap {
    /// Continue into the previous/next row; wrap around the whole sequence.
    #[default]
    Sequence,
    /// Wrap around inside the current row.
    Row,
}

/// Cursor location after a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    /// Index in the item sequence.
    pub index: usize,
    pub row: usize,
    pub column: usize,
    /// The movement left the previous row.
    pub row_changed: bool,
    /// The movement wrapped past the first row or item.
    pub overflowed_min: bool,
    /// The movement wrapped past the last row or item.
    pub overflowed_max: bool,
}

/// Cursor state over items grouped into rows.
///
/// Vertical moves keep a sticky preferred column, so a move up followed by a
/// move down always returns to the starting item even across shorter rows.
/// All movements are cyclic and return `None` only for an empty grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridNavigation {
    row_starts: Vec<usize>,
    row_lens: Vec<usize>,
    len: usize,
    cursor: usize,
    preferred_column: usize,
    wrap: HorizontalWrap,
}

impl GridNavigation {
    /// Build from row lengths; empty rows are skipped.
    pub fn from_row_lengths<I>(lengths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut grid = Self::default();
        grid.set_rows(lengths);
        grid
    }

    /// Build from item rectangles, inferring rows from their top edges.
    pub fn from_rects(rects: &[Rect], row_tolerance: u16) -> Self {
        Self::from_row_lengths(infer_rows(rects, row_tolerance))
    }

    pub fn with_wrap(mut self, wrap: HorizontalWrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn wrap(&self) -> HorizontalWrap {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: HorizontalWrap) {
        self.wrap = wrap;
    }

    /// Replace the row structure, clamping the cursor into the new sequence.
    pub fn relayout(&mut self, rects: &[Rect], row_tolerance: u16) {
        self.set_rows(infer_rows(rects, row_tolerance));
    }

    fn set_rows<I>(&mut self, lengths: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.row_starts.clear();
        self.row_lens.clear();
        self.len = 0;
        for length in lengths.into_iter().filter(|l| *l > 0) {
            self.row_starts.push(self.len);
            self.row_lens.push(length);
            self.len += length;
        }
        self.cursor = self.clamp_sequence_index(self.cursor);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn row_count(&self) -> usize {
        self.row_lens.len()
    }

    /// Number of items in `row`, 0 when out of range.
    pub fn row_len(&self, row: usize) -> usize {
        self.row_lens.get(row).copied().unwrap_or(0)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_row(&self) -> usize {
        self.locate(self.cursor).0
    }

    pub fn cursor_column(&self) -> usize {
        self.locate(self.cursor).1
    }

    /// Current position, without any movement flags set.
    pub fn position(&self) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let (row, column) = self.locate(self.cursor);
        Some(CursorPosition {
            index: self.cursor,
            row,
            column,
            row_changed: false,
            overflowed_min: false,
            overflowed_max: false,
        })
    }

    /// Clamp an arbitrary index into `[0, len)`; 0 for an empty grid.
    pub fn clamp_sequence_index(&self, index: usize) -> usize {
        index.min(self.len.saturating_sub(1))
    }

    pub fn move_up(&mut self) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let row = self.cursor_row();
        let target = if row == 0 { self.row_count() - 1 } else { row - 1 };
        let index = self.index_at(target, self.preferred_column);
        Some(self.settle(index, row, row == 0, false))
    }

    pub fn move_down(&mut self) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let row = self.cursor_row();
        let last = row + 1 == self.row_count();
        let target = if last { 0 } else { row + 1 };
        let index = self.index_at(target, self.preferred_column);
        Some(self.settle(index, row, false, last))
    }

    pub fn move_left(&mut self) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let (row, column) = self.locate(self.cursor);
        let row_end = self.row_starts[row] + self.row_lens[row] - 1;
        let (index, wrapped) = match self.wrap {
            HorizontalWrap::Sequence if self.cursor == 0 => (self.len - 1, true),
            HorizontalWrap::Sequence => (self.cursor - 1, false),
            HorizontalWrap::Row if column == 0 => (row_end, true),
            HorizontalWrap::Row => (self.cursor - 1, false),
        };
        Some(self.settle_horizontal(index, row, wrapped, false))
    }

    pub fn move_right(&mut self) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let (row, column) = self.locate(self.cursor);
        let (index, wrapped) = match self.wrap {
            HorizontalWrap::Sequence if self.cursor + 1 == self.len => (0, true),
            HorizontalWrap::Sequence => (self.cursor + 1, false),
            HorizontalWrap::Row if column + 1 == self.row_lens[row] => (self.row_starts[row], true),
            HorizontalWrap::Row => (self.cursor + 1, false),
        };
        Some(self.settle_horizontal(index, row, false, wrapped))
    }

    pub fn move_row_start(&mut self) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let row = self.cursor_row();
        Some(self.settle_horizontal(self.row_starts[row], row, false, false))
    }

    pub fn move_row_end(&mut self) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let row = self.cursor_row();
        let index = self.row_starts[row] + self.row_lens[row] - 1;
        Some(self.settle_horizontal(index, row, false, false))
    }

    pub fn focus_first_row(&mut self) -> Option<CursorPosition> {
        self.jump_to_row(0)
    }

    pub fn focus_last_row(&mut self) -> Option<CursorPosition> {
        self.jump_to_row(self.row_count().saturating_sub(1))
    }

    /// Move to an item, clamping out-of-range indices.
    pub fn jump_to(&mut self, index: usize) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let row = self.cursor_row();
        let index = self.clamp_sequence_index(index);
        Some(self.settle_horizontal(index, row, false, false))
    }

    /// Move to a row, clamping out-of-range rows; the preferred column is kept.
    pub fn jump_to_row(&mut self, target: usize) -> Option<CursorPosition> {
        if self.is_empty() {
            return None;
        }
        let row = self.cursor_row();
        let target = target.min(self.row_count() - 1);
        let index = self.index_at(target, self.preferred_column);
        Some(self.settle(index, row, false, false))
    }

    /// Place the cursor on `index`. Out of range leaves the cursor unchanged.
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.cursor = index;
        self.preferred_column = self.cursor_column();
        true
    }

    /// Move to `row` keeping the preferred column. Out of range is rejected.
    pub fn set_current_row(&mut self, row: usize) -> bool {
        if row >= self.row_count() {
            return false;
        }
        self.cursor = self.index_at(row, self.preferred_column);
        true
    }

    /// Move to `column` of the current row. Out of range is rejected.
    pub fn set_current_row_column(&mut self, column: usize) -> bool {
        if self.is_empty() {
            return false;
        }
        let row = self.cursor_row();
        if column >= self.row_lens[row] {
            return false;
        }
        self.cursor = self.row_starts[row] + column;
        self.preferred_column = column;
        true
    }

    /// Column vertical moves aim for.
    pub fn preferred_column(&self) -> usize {
        self.preferred_column
    }

    pub(crate) fn restore_preferred_column(&mut self, column: usize) {
        self.preferred_column = column;
    }

    fn locate(&self, index: usize) -> (usize, usize) {
        if self.is_empty() {
            return (0, 0);
        }
        let row = match self.row_starts.binary_search(&index) {
            Ok(row) => row,
            Err(next) => next.saturating_sub(1),
        };
        (row, index - self.row_starts[row])
    }

    fn index_at(&self, row: usize, column: usize) -> usize {
        self.row_starts[row] + column.min(self.row_lens[row] - 1)
    }

    fn settle(
        &mut self,
        index: usize,
        previous_row: usize,
        overflowed_min: bool,
        overflowed_max: bool,
    ) -> CursorPosition {
        self.cursor = index;
        let (row, column) = self.locate(index);
        CursorPosition {
            index,
            row,
            column,
            row_changed: row != previous_row,
            overflowed_min,
            overflowed_max,
        }
    }

    fn settle_horizontal(
        &mut self,
        index: usize,
        previous_row: usize,
        overflowed_min: bool,
        overflowed_max: bool,
    ) -> CursorPosition {
        let position = self.settle(index, previous_row, overflowed_min, overflowed_max);
        self.preferred_column = position.column;
        position
    }
}
