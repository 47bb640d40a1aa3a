//! Grid cursor movement bindings.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use keygrid_config::MovementTriggers;
use keygrid_config::constants::DIGITS_METAKEY;

use super::{MoveVerdict, WrapperError};
use crate::grid::{CursorPosition, GridNavigation, SharedGrid};
use crate::hotkeys::{ActionId, ContextId, Dispatch, HotkeyEngine, HotkeyOptions, HotkeyRegistration};

type MoveCallback = Rc<RefCell<Box<dyn FnMut(&CursorPosition) -> MoveVerdict>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movement {
    Up,
    Down,
    Left,
    Right,
    RowStart,
    RowEnd,
    FirstRow,
    LastRow,
    GotoItem,
    GotoRow,
}

impl Movement {
    fn description(self) -> &'static str {
        match self {
            Self::Up => "<navigation>Move up",
            Self::Down => "<navigation>Move down",
            Self::Left => "<navigation>Move left",
            Self::Right => "<navigation>Move right",
            Self::RowStart => "<navigation>Go to row start",
            Self::RowEnd => "<navigation>Go to row end",
            Self::FirstRow => "<navigation>Go to first row",
            Self::LastRow => "<navigation>Go to last row",
            Self::GotoItem => "<navigation>Go to item N",
            Self::GotoRow => "<navigation>Go to row N",
        }
    }

    fn repeats(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// `motion` is the 1-based count typed before a goto finalizer.
    fn perform(self, grid: &mut GridNavigation, motion: Option<u64>) -> Option<CursorPosition> {
        let target = || {
            let n = motion.unwrap_or(1).saturating_sub(1);
            usize::try_from(n).unwrap_or(usize::MAX)
        };
        match self {
            Self::Up => grid.move_up(),
            Self::Down => grid.move_down(),
            Self::Left => grid.move_left(),
            Self::Right => grid.move_right(),
            Self::RowStart => grid.move_row_start(),
            Self::RowEnd => grid.move_row_end(),
            Self::FirstRow => grid.focus_first_row(),
            Self::LastRow => grid.focus_last_row(),
            Self::GotoItem => grid.jump_to(target()),
            Self::GotoRow => grid.jump_to_row(target()),
        }
    }

    /// Undo a move from `prior`, sticky column included.
    fn revert(self, grid: &mut GridNavigation, prior: &CursorPosition, preferred_column: usize) {
        match self {
            Self::Up => {
                grid.move_down();
            }
            Self::Down => {
                grid.move_up();
            }
            Self::Left => {
                grid.move_right();
            }
            Self::Right => {
                grid.move_left();
            }
            Self::RowStart | Self::RowEnd => {
                grid.set_current_row_column(prior.column);
            }
            Self::FirstRow | Self::LastRow | Self::GotoItem => {
                grid.set_cursor(prior.index);
            }
            Self::GotoRow => {
                grid.set_current_row(prior.row);
            }
        }
        grid.restore_preferred_column(preferred_column);
    }
}

/// Registers movement bindings that drive a shared grid cursor.
///
/// ```no_run
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use keygrid_config::MovementTriggers;
/// use keygrid_core::{CursorMovement, GridNavigation, HotkeyEngine, MoveVerdict};
///
/// let mut engine: HotkeyEngine = HotkeyEngine::default();
/// let context = engine.create_context("grid");
/// let grid = Rc::new(RefCell::new(GridNavigation::from_row_lengths([3, 3, 2])));
///
/// CursorMovement::new(grid, &MovementTriggers::default())
///     .on_move(|position| {
///         if position.index == 7 { MoveVerdict::Reject } else { MoveVerdict::Accept }
///     })
///     .register(&mut engine, context)
///     .unwrap();
/// ```
pub struct CursorMovement {
    grid: SharedGrid,
    triggers: MovementTriggers,
    initial_cursor: Option<usize>,
    on_move: Option<Box<dyn FnMut(&CursorPosition) -> MoveVerdict>>,
}

impl fmt::Debug for CursorMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMovement")
            .field("triggers", &self.triggers)
            .field("initial_cursor", &self.initial_cursor)
            .finish_non_exhaustive()
    }
}

impl CursorMovement {
    pub fn new(grid: SharedGrid, triggers: &MovementTriggers) -> Self {
        Self {
            grid,
            triggers: triggers.clone(),
            initial_cursor: None,
            on_move: None,
        }
    }

    /// Place the cursor at `index` when registering.
    pub fn initial_cursor(mut self, index: usize) -> Self {
        self.initial_cursor = Some(index);
        self
    }

    /// Called with every new position; `Reject` undoes the move.
    pub fn on_move<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&CursorPosition) -> MoveVerdict + 'static,
    {
        self.on_move = Some(Box::new(callback));
        self
    }

    /// Register every movement with a non-empty trigger in `context`.
    ///
    /// # Errors
    ///
    /// `CursorOutOfBounds` when the initial cursor does not exist, or the
    /// engine's registration error.
    pub fn register<A: ActionId>(
        self,
        engine: &mut HotkeyEngine<A>,
        context: ContextId,
    ) -> Result<(), WrapperError> {
        if let Some(index) = self.initial_cursor {
            let mut grid = self.grid.borrow_mut();
            if !grid.set_cursor(index) {
                return Err(WrapperError::CursorOutOfBounds {
                    index,
                    len: grid.len(),
                });
            }
        }

        let on_move: MoveCallback = Rc::new(RefCell::new(
            self.on_move
                .unwrap_or_else(|| Box::new(|_: &CursorPosition| MoveVerdict::Accept)),
        ));

        let goto = |finalizer: &str| {
            let finalizer = finalizer.trim();
            if finalizer.is_empty() {
                String::new()
            } else {
                format!("{} {}", DIGITS_METAKEY, finalizer)
            }
        };
        let t = &self.triggers;
        let table = [
            (t.up.clone(), Movement::Up),
            (t.down.clone(), Movement::Down),
            (t.left.clone(), Movement::Left),
            (t.right.clone(), Movement::Right),
            (t.row_start.clone(), Movement::RowStart),
            (t.row_end.clone(), Movement::RowEnd),
            (t.first_row.clone(), Movement::FirstRow),
            (t.last_row.clone(), Movement::LastRow),
            (goto(&t.goto_item_finalizer), Movement::GotoItem),
            (goto(&t.goto_row_finalizer), Movement::GotoRow),
        ];

        for (trigger, movement) in table {
            if trigger.trim().is_empty() {
                continue;
            }
            let grid = Rc::clone(&self.grid);
            let on_move = Rc::clone(&on_move);
            let registration = HotkeyRegistration::new([trigger], move |invocation| {
                apply(&grid, &on_move, movement, invocation.matched().motion());
                Ok(Dispatch::Done)
            })
            .options(
                HotkeyOptions::new()
                    .description(movement.description())
                    .can_repeat(movement.repeats()),
            );
            engine.register(context, registration)?;
        }

        Ok(())
    }
}

fn apply(grid: &SharedGrid, on_move: &MoveCallback, movement: Movement, motion: Option<u64>) {
    let (prior, preferred_column, moved) = {
        let mut grid = grid.borrow_mut();
        let Some(prior) = grid.position() else {
            return;
        };
        let preferred_column = grid.preferred_column();
        (prior, preferred_column, movement.perform(&mut grid, motion))
    };
    let Some(position) = moved else {
        return;
    };

    let verdict = (on_move.borrow_mut())(&position);
    if verdict == MoveVerdict::Reject {
        movement.revert(&mut grid.borrow_mut(), &prior, preferred_column);
        tracing::debug!(?movement, index = prior.index, "Cursor move rejected");
    }
}
