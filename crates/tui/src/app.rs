//! Demo application state.
//!
//! Responsibilities:
//! - Build the hotkey contexts and register every demo binding.
//! - Own the view state the bindings mutate.
//! - Forward key and resize events to the engine and the grid.
//!
//! Does NOT handle:
//! - Rendering (see `ui`).
//! - Terminal I/O or the event loop (see `main.rs`).
//!
//! Invariants:
//! - The board context is final once `App::new` returns.
//! - Item indices in the view state are positions in the search pool, which
//!   are also grid sequence indices.

use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use keygrid_config::{EngineConfig, HotkeyAction};
use keygrid_core::grid::GridNavigation;
use keygrid_core::hotkeys::CheatSheetGroup;
use keygrid_core::wrappers::show_cheat_sheet;
use keygrid_core::{
    ActionRegistration, ContextId, CursorMovement, Dispatch, GridNavigationWrapper,
    HorizontalWrap, HotkeyEngine, HotkeyOptions, HotkeyRegistration, KeyOutcome, LayoutError,
    LayoutProvider, MoveVerdict, OverrideBehavior, SearchHotkeys, SearchResults, SharedGrid,
    WrapOrder,
};
use ratatui::layout::Rect;

use crate::layout::{GRID_CONTAINER, TILE_MEMBER, TileLayout};
use crate::ui;

type SharedState = Rc<RefCell<ViewState>>;
type SharedResults = Rc<RefCell<SearchResults<String>>>;

/// Register used before any `` ` `` selection.
pub const DEFAULT_REGISTER: char = '"';

const ADJECTIVES: [&str; 12] = [
    "amber", "brisk", "cobalt", "dusty", "eager", "frosty", "gentle", "hollow", "ivory", "jolly",
    "keen", "lunar",
];
const NOUNS: [&str; 10] = [
    "falcon", "otter", "maple", "harbor", "comet", "willow", "badger", "canyon", "ember",
    "meadow",
];

/// Deterministic two-word tile names.
pub fn demo_items(count: usize) -> Vec<String> {
    let combinations = ADJECTIVES.len() * NOUNS.len();
    (0..count)
        .map(|i| {
            let adjective = ADJECTIVES[i % ADJECTIVES.len()];
            let noun = NOUNS[(i / ADJECTIVES.len()) % NOUNS.len()];
            match i / combinations {
                0 => format!("{adjective} {noun}"),
                round => format!("{adjective} {noun} {round}"),
            }
        })
        .collect()
}

/// Everything the bindings change and the UI reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub show_cheat_sheet: bool,
    pub quit: bool,
    pub status: String,
    pub selected: BTreeSet<usize>,
    /// Items marked for deletion.
    pub deleted: BTreeSet<usize>,
    /// Register the next yank writes to.
    pub register: char,
    pub registers: BTreeMap<char, String>,
    /// Partial query while the search capture is open.
    pub search_preview: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            show_cheat_sheet: false,
            quit: false,
            status: String::new(),
            selected: BTreeSet::new(),
            deleted: BTreeSet::new(),
            register: DEFAULT_REGISTER,
            registers: BTreeMap::new(),
            search_preview: None,
        }
    }
}

/// The demo application.
pub struct App {
    engine: HotkeyEngine,
    navigation: GridNavigationWrapper<TileLayout>,
    grid: SharedGrid,
    results: SharedResults,
    state: SharedState,
    board: ContextId,
    last_query: String,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("engine", &self.engine)
            .field("board", &self.board)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Build the contexts, register the bindings and activate the board.
    ///
    /// # Errors
    ///
    /// Fails on an invalid trigger in `config` or when the tiles cannot be laid out.
    pub fn new(
        config: &EngineConfig,
        items: Vec<String>,
        tile_width: u16,
        wrap: HorizontalWrap,
    ) -> Result<Self> {
        let mut engine = HotkeyEngine::new(&config.hotkeys);
        let app_context = engine.create_context("app");
        let board = engine
            .create_child_context(app_context, "board")
            .context("Failed to create board context")?;

        let layout = TileLayout::new(items.len(), tile_width);
        let navigation =
            GridNavigationWrapper::setup(layout, GRID_CONTAINER, TILE_MEMBER, &config.grid, wrap)
                .context("Failed to lay out tiles")?;
        let grid = navigation.grid();
        let results: SharedResults = Rc::new(RefCell::new(SearchResults::new(
            items,
            config.search.clone(),
        )));
        let state: SharedState = Rc::new(RefCell::new(ViewState::default()));

        register_general(&mut engine, app_context, config, &state)?;
        register_item_placeholders(&mut engine, board, config, &grid, &results, &state)?;
        register_item_actions(&mut engine, board, config, &grid, &results, &state)?;
        register_navigation(&mut engine, board, config, &grid, &results, &state)?;
        engine.set_final(board)?;

        engine.push(app_context)?;
        engine.push(board)?;
        tracing::info!(
            items = grid.borrow().len(),
            stack = ?engine.active_stack(),
            "Demo application ready"
        );

        Ok(Self {
            engine,
            navigation,
            grid,
            results,
            state,
            board,
            last_query: String::new(),
        })
    }

    /// Feed a terminal key event to the engine.
    pub async fn handle_key(&mut self, event: KeyEvent) -> KeyOutcome {
        let outcome = self.engine.handle_key(event).await;
        tracing::trace!(?event, ?outcome, "Key handled");

        match &outcome {
            KeyOutcome::CaptureCancelled => {
                let mut state = self.state.borrow_mut();
                state.search_preview = None;
                state.status = "Search cancelled".to_string();
            }
            KeyOutcome::HandlerFailed { trigger, .. } => {
                self.state.borrow_mut().status = format!("'{trigger}' failed, see log");
            }
            _ => {}
        }
        if self.engine.capture_state().is_idle() {
            self.state.borrow_mut().search_preview = None;
        }
        self.report_empty_search();
        outcome
    }

    fn report_empty_search(&mut self) {
        let results = self.results.borrow();
        if results.query() == self.last_query {
            return;
        }
        self.last_query = results.query().to_string();
        if results.is_empty() && !self.last_query.is_empty() {
            self.state.borrow_mut().status = format!("No match for '{}'", self.last_query);
        }
    }

    /// Lay the tiles out for a terminal of the given size.
    pub fn resize(&mut self, area: Rect) -> Result<(), LayoutError> {
        self.navigation.provider_mut().set_area(ui::grid_area(area));
        self.navigation.refresh()
    }

    pub fn should_quit(&self) -> bool {
        self.state.borrow().quit
    }

    pub fn engine(&self) -> &HotkeyEngine {
        &self.engine
    }

    pub fn board(&self) -> ContextId {
        self.board
    }

    pub fn state(&self) -> Ref<'_, ViewState> {
        self.state.borrow()
    }

    pub fn grid(&self) -> Ref<'_, GridNavigation> {
        self.grid.borrow()
    }

    pub fn results(&self) -> Ref<'_, SearchResults<String>> {
        self.results.borrow()
    }

    /// Area the tiles are laid out in.
    pub fn grid_area(&self) -> Rect {
        self.navigation.provider().area()
    }

    /// Tile rectangles in item order, before scrolling.
    pub fn tile_rects(&self) -> Vec<Rect> {
        self.navigation
            .provider()
            .members(GRID_CONTAINER, TILE_MEMBER)
            .unwrap_or_default()
    }

    /// Text typed so far in an open capture.
    pub fn capture_buffer(&self) -> Option<&str> {
        self.engine.capture_state().capture().map(|c| c.buffer())
    }

    pub fn cheat_sheet(&self) -> Vec<CheatSheetGroup> {
        self.engine.cheat_sheet()
    }
}

fn register_general(
    engine: &mut HotkeyEngine,
    context: ContextId,
    config: &EngineConfig,
    state: &SharedState,
) -> Result<()> {
    let quit_state = Rc::clone(state);
    let quit = HotkeyRegistration::new(
        config.actions.triggers_for(HotkeyAction::QuitContext),
        move |_| {
            let mut state = quit_state.borrow_mut();
            if state.show_cheat_sheet {
                state.show_cheat_sheet = false;
            } else {
                state.quit = true;
            }
            Ok(Dispatch::Done)
        },
    )
    .options(HotkeyOptions::new().description("<general>Close popup or quit"));
    engine.register_action(context, HotkeyAction::QuitContext, ActionRegistration::new(quit))?;

    let toggle_state = Rc::clone(state);
    show_cheat_sheet(
        engine,
        context,
        HotkeyAction::ToggleCheatSheet,
        config.actions.triggers_for(HotkeyAction::ToggleCheatSheet),
        move || {
            let mut state = toggle_state.borrow_mut();
            state.show_cheat_sheet = !state.show_cheat_sheet;
        },
    )?;
    Ok(())
}

/// The bindings an item component declares before a concrete screen decides
/// what they do. Yanking already has a working base handler.
fn register_item_placeholders(
    engine: &mut HotkeyEngine,
    board: ContextId,
    config: &EngineConfig,
    grid: &SharedGrid,
    results: &SharedResults,
    state: &SharedState,
) -> Result<()> {
    let placeholders = [
        HotkeyAction::ItemSelection,
        HotkeyAction::ItemDeletion,
        HotkeyAction::ItemRenaming,
        HotkeyAction::RegisterChange,
    ];
    for action in placeholders {
        let triggers = config.actions.triggers_for(action);
        if triggers.is_empty() {
            tracing::debug!(%action, "Action disabled by configuration");
            continue;
        }
        engine.register_action(
            board,
            action,
            ActionRegistration::new(HotkeyRegistration::placeholder(triggers)),
        )?;
    }

    let triggers = config.actions.triggers_for(HotkeyAction::ItemYanking);
    if triggers.is_empty() {
        return Ok(());
    }
    let (grid, results, state) = (Rc::clone(grid), Rc::clone(results), Rc::clone(state));
    let yank = HotkeyRegistration::new(triggers, move |_| {
        let index = grid.borrow().cursor();
        let Some(item) = results.borrow().pool().get(index).cloned() else {
            return Ok(Dispatch::Done);
        };
        let mut state = state.borrow_mut();
        let register = state.register;
        state.registers.insert(register, item);
        Ok(Dispatch::Done)
    })
    .options(HotkeyOptions::new().description("<items>Yank item"));
    engine.register_action(board, HotkeyAction::ItemYanking, ActionRegistration::new(yank))?;
    Ok(())
}

/// Concrete behavior for the item placeholders.
fn register_item_actions(
    engine: &mut HotkeyEngine,
    board: ContextId,
    config: &EngineConfig,
    grid: &SharedGrid,
    results: &SharedResults,
    state: &SharedState,
) -> Result<()> {
    // Overrides of a disabled action would register a binding without triggers.
    let enabled = |action: HotkeyAction| !config.actions.triggers_for(action).is_empty();

    let toggles = [
        (HotkeyAction::ItemSelection, "<items>Select item", "Selected"),
        (HotkeyAction::ItemDeletion, "<items>Mark item for deletion", "Marked"),
    ];
    for (action, description, verb) in toggles.into_iter().filter(|t| enabled(t.0)) {
        let (grid, state) = (Rc::clone(grid), Rc::clone(state));
        let registration = HotkeyRegistration::new(Vec::<String>::new(), move |_| {
            let index = grid.borrow().cursor();
            if grid.borrow().is_empty() {
                return Ok(Dispatch::Done);
            }
            let mut state = state.borrow_mut();
            let set = match action {
                HotkeyAction::ItemDeletion => &mut state.deleted,
                _ => &mut state.selected,
            };
            let message = if set.insert(index) {
                format!("{verb} item {}", index + 1)
            } else {
                set.remove(&index);
                format!("Un{} item {}", verb.to_lowercase(), index + 1)
            };
            state.status = message;
            Ok(Dispatch::Done)
        })
        .options(HotkeyOptions::new().description(description));
        engine.register_action(board, action, ActionRegistration::replace(registration))?;
    }

    if enabled(HotkeyAction::ItemRenaming) {
        register_rename(engine, board, grid, results, state)?;
    }
    if enabled(HotkeyAction::RegisterChange) {
        register_register_change(engine, board, state)?;
    }
    if enabled(HotkeyAction::ItemYanking) {
        register_yank_report(engine, board, state)?;
    }
    Ok(())
}

fn register_rename(
    engine: &mut HotkeyEngine,
    board: ContextId,
    grid: &SharedGrid,
    results: &SharedResults,
    state: &SharedState,
) -> Result<()> {
    let (rename_grid, rename_results, rename_state) =
        (Rc::clone(grid), Rc::clone(results), Rc::clone(state));
    let rename = HotkeyRegistration::new(Vec::<String>::new(), move |_| {
        let index = rename_grid.borrow().cursor();
        let mut results = rename_results.borrow_mut();
        let mut pool = results.pool().to_vec();
        let Some(item) = pool.get_mut(index) else {
            return Ok(Dispatch::Done);
        };
        *item = item.split_whitespace().rev().collect::<Vec<_>>().join(" ");
        rename_state.borrow_mut().status = format!("Renamed item {} to '{}'", index + 1, item);
        results.set_pool(pool);
        Ok(Dispatch::Done)
    })
    .options(HotkeyOptions::new().description("<items>Swap the words of the item name"));
    engine.register_action(
        board,
        HotkeyAction::ItemRenaming,
        ActionRegistration::replace(rename),
    )?;
    Ok(())
}

fn register_register_change(
    engine: &mut HotkeyEngine,
    board: ContextId,
    state: &SharedState,
) -> Result<()> {
    let register_state = Rc::clone(state);
    let register = HotkeyRegistration::new(Vec::<String>::new(), move |invocation| {
        let Some(register) = invocation
            .matched()
            .captured
            .as_deref()
            .and_then(|c| c.chars().next())
        else {
            anyhow::bail!("register change completed without a register name");
        };
        let mut state = register_state.borrow_mut();
        state.register = register;
        state.status = format!("Using register '{register}'");
        Ok(Dispatch::Done)
    })
    .options(HotkeyOptions::new().description("<items>Choose register"));
    engine.register_action(
        board,
        HotkeyAction::RegisterChange,
        ActionRegistration::replace(register),
    )?;
    Ok(())
}

/// Status report around the base yank handler.
fn register_yank_report(
    engine: &mut HotkeyEngine,
    board: ContextId,
    state: &SharedState,
) -> Result<()> {
    let yank_state = Rc::clone(state);
    let report = HotkeyRegistration::new(Vec::<String>::new(), move |_| {
        let mut state = yank_state.borrow_mut();
        let register = state.register;
        if let Some(item) = state.registers.get(&register).cloned() {
            state.status = format!("Yanked '{item}' into register '{register}'");
        }
        Ok(Dispatch::Done)
    });
    engine.register_action(
        board,
        HotkeyAction::ItemYanking,
        ActionRegistration::new(report)
            .with_override(OverrideBehavior::Wrap(WrapOrder::InnerFirst)),
    )?;
    Ok(())
}

fn register_navigation(
    engine: &mut HotkeyEngine,
    board: ContextId,
    config: &EngineConfig,
    grid: &SharedGrid,
    results: &SharedResults,
    state: &SharedState,
) -> Result<()> {
    let move_state = Rc::clone(state);
    CursorMovement::new(Rc::clone(grid), &config.movement)
        .on_move(move |position| {
            move_state.borrow_mut().status = format!(
                "Item {} (row {}, column {})",
                position.index + 1,
                position.row + 1,
                position.column + 1
            );
            MoveVerdict::Accept
        })
        .register(engine, board)?;

    let preview_state = Rc::clone(state);
    let (search_grid, search_state) = (Rc::clone(grid), Rc::clone(state));
    SearchHotkeys::new(Rc::clone(results), &config.search_triggers)
        .live(move |partial| {
            preview_state.borrow_mut().search_preview = Some(partial.to_string());
        })
        .on_update(move |update| {
            if !search_grid.borrow_mut().set_cursor(update.pool_index) {
                return MoveVerdict::Reject;
            }
            search_state.borrow_mut().status = format!(
                "Match {}/{} for '{}': {}",
                update.index + 1,
                update.total,
                update.query,
                update.item
            );
            MoveVerdict::Accept
        })
        .register(engine, board)?;
    Ok(())
}
