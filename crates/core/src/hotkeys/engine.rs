//! The hotkey engine: context registry, activation stack and dispatch.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use keygrid_config::constants::MAX_TRIGGERED_HISTORY;
use keygrid_config::keybind::{CaptureSpec, ChordMatcher, TriggerPattern};
use keygrid_config::{HotkeyAction, HotkeyTiming};

use super::binding::{
    Dispatch, EngineRequest, HotkeyInvocation, HotkeyMatch, HotkeyRegistration, KeyMode,
};
use super::capture::{Capture, CaptureState, CaptureStep};
use super::cheat_sheet::{self, CheatSheetGroup};
use super::context::{ActionId, ActionRegistration, Binding, ContextId, HotkeyContext};
use super::error::HotkeyError;
use super::history::KeyHistory;

/// What the engine did with a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The engine is paused.
    Paused,
    /// Modifier-only or key-up noise, or a non-typing key during a capture.
    Ignored,
    /// No binding in the active chain matched.
    NoMatch,
    /// A binding matched an auto-repeat it does not accept, or too soon.
    Blocked,
    /// A capture trigger switched to text accumulation.
    CaptureStarted { context: ContextId, trigger: String },
    /// The capture buffer changed.
    CaptureUpdated,
    /// The capture was aborted by its cancel terminator.
    CaptureCancelled,
    /// A handler ran to completion (or was spawned).
    Dispatched { context: ContextId, trigger: String },
    /// A handler returned an error; it has been logged.
    HandlerFailed { context: ContextId, trigger: String },
}

impl KeyOutcome {
    /// Whether the key was consumed by the engine.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Paused | Self::Ignored | Self::NoMatch)
    }
}

/// A completed hotkey, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRecord {
    pub context: ContextId,
    pub trigger: String,
    pub at: Instant,
}

struct Found {
    context: ContextId,
    binding: usize,
    trigger: String,
    motions: Vec<u64>,
    capture: Option<CaptureSpec>,
    clears_history: bool,
}

/// Owns every hotkey context and routes key events to their bindings.
///
/// One engine lives as long as the application shell. Components create
/// contexts, register bindings, finalize them and push them while mounted;
/// `handle_key` matches events against the top of the activation stack and
/// then its ancestors.
pub struct HotkeyEngine<A = HotkeyAction> {
    contexts: HashMap<ContextId, HotkeyContext<A>>,
    next_id: u64,
    stack: Vec<ContextId>,
    capture: CaptureState,
    key_down: KeyHistory,
    key_up: KeyHistory,
    triggered: VecDeque<TriggerRecord>,
    sequence_timeout: Duration,
    repeat_interval: Duration,
    paused: bool,
}

impl<A: ActionId> Default for HotkeyEngine<A> {
    fn default() -> Self {
        Self::new(&HotkeyTiming::default())
    }
}

impl<A> fmt::Debug for HotkeyEngine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyEngine")
            .field("contexts", &self.contexts.len())
            .field("stack", &self.stack)
            .field("capture", &self.capture)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl<A: ActionId> HotkeyEngine<A> {
    pub fn new(timing: &HotkeyTiming) -> Self {
        Self {
            contexts: HashMap::new(),
            next_id: 0,
            stack: Vec::new(),
            capture: CaptureState::Idle,
            key_down: KeyHistory::new(timing.history_capacity),
            key_up: KeyHistory::new(timing.history_capacity),
            triggered: VecDeque::with_capacity(MAX_TRIGGERED_HISTORY),
            sequence_timeout: timing.sequence_timeout(),
            repeat_interval: timing.repeat_interval(),
            paused: false,
        }
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Create a root context.
    pub fn create_context(&mut self, name: impl Into<String>) -> ContextId {
        self.insert_context(name.into(), None)
    }

    /// Create a context whose unmatched keys fall through to `parent`.
    pub fn create_child_context(
        &mut self,
        parent: ContextId,
        name: impl Into<String>,
    ) -> Result<ContextId, HotkeyError> {
        if !self.contexts.contains_key(&parent) {
            return Err(HotkeyError::UnknownContext { id: parent });
        }
        let id = self.insert_context(name.into(), Some(parent));
        if let Some(parent) = self.contexts.get_mut(&parent) {
            parent.children.push(id);
        }
        Ok(id)
    }

    fn insert_context(&mut self, name: String, parent: Option<ContextId>) -> ContextId {
        let id = ContextId::new(self.next_id);
        self.next_id += 1;
        tracing::debug!(context = %name, %id, parent = ?parent, "Hotkey context created");
        self.contexts.insert(id, HotkeyContext::new(name, parent));
        id
    }

    fn context_mut(&mut self, id: ContextId) -> Result<&mut HotkeyContext<A>, HotkeyError> {
        self.contexts
            .get_mut(&id)
            .ok_or(HotkeyError::UnknownContext { id })
    }

    /// Add a binding that is not tied to an action identifier.
    pub fn register(
        &mut self,
        context: ContextId,
        registration: HotkeyRegistration,
    ) -> Result<(), HotkeyError> {
        self.context_mut(context)?.register(registration)
    }

    /// Add, or override according to the registration's behavior, the
    /// binding for `action`.
    pub fn register_action(
        &mut self,
        context: ContextId,
        action: A,
        registration: ActionRegistration,
    ) -> Result<(), HotkeyError> {
        self.context_mut(context)?
            .register_action(action, registration)
    }

    /// Freeze a context's bindings.
    pub fn set_final(&mut self, context: ContextId) -> Result<(), HotkeyError> {
        self.context_mut(context)?.finalize()
    }

    pub fn contains(&self, context: ContextId) -> bool {
        self.contexts.contains_key(&context)
    }

    pub fn context_name(&self, context: ContextId) -> Option<&str> {
        self.contexts.get(&context).map(|c| c.name.as_str())
    }

    pub fn parent_of(&self, context: ContextId) -> Option<ContextId> {
        self.contexts.get(&context).and_then(|c| c.parent)
    }

    pub fn is_final(&self, context: ContextId) -> bool {
        self.contexts.get(&context).is_some_and(|c| c.finalized)
    }

    // ------------------------------------------------------------------
    // Activation stack
    // ------------------------------------------------------------------

    /// Activate a context.
    ///
    /// Returns `Ok(false)` (and logs a warning) for an unknown context.
    ///
    /// # Errors
    ///
    /// `AlreadyActive` when the context is on the stack, `ParentNotActive`
    /// when its parent is not.
    pub fn push(&mut self, context: ContextId) -> Result<bool, HotkeyError> {
        let Some(entry) = self.contexts.get(&context) else {
            tracing::warn!(%context, "Cannot activate unknown hotkey context");
            return Ok(false);
        };
        let name = entry.name.clone();
        let parent = entry.parent;

        if self.stack.contains(&context) {
            return Err(HotkeyError::AlreadyActive { context: name });
        }
        if let Some(parent) = parent
            && !self.stack.contains(&parent)
        {
            let parent = self.context_name(parent).unwrap_or_default().to_string();
            return Err(HotkeyError::ParentNotActive {
                context: name,
                parent,
            });
        }

        self.stack.push(context);
        self.clear_histories();
        tracing::debug!(context = %name, depth = self.stack.len(), "Hotkey context activated");
        Ok(true)
    }

    /// Deactivate the innermost context.
    pub fn pop(&mut self) -> Option<ContextId> {
        let context = self.stack.pop()?;
        self.after_removal(&[context]);
        tracing::debug!(%context, depth = self.stack.len(), "Hotkey context popped");
        Some(context)
    }

    /// Remove a context and all of its descendants from the stack.
    ///
    /// Returns whether anything was active.
    pub fn deactivate(&mut self, context: ContextId) -> bool {
        let subtree = self.subtree(context);
        let before = self.stack.len();
        self.stack.retain(|c| !subtree.contains(c));
        let removed = self.stack.len() != before;
        if removed {
            self.after_removal(&subtree);
            tracing::debug!(%context, removed = before - self.stack.len(), "Hotkey context deactivated");
        }
        removed
    }

    /// Unmount a context: deactivate it, discard a capture owned by its
    /// subtree and drop the subtree from the registry.
    ///
    /// Returns `false` (and logs a warning) for an unknown context.
    pub fn destroy(&mut self, context: ContextId) -> bool {
        let Some(parent) = self.contexts.get(&context).map(|c| c.parent) else {
            tracing::warn!(%context, "Cannot destroy unknown hotkey context");
            return false;
        };

        let subtree = self.subtree(context);
        self.stack.retain(|c| !subtree.contains(c));
        self.after_removal(&subtree);

        if let Some(parent) = parent.and_then(|p| self.contexts.get_mut(&p)) {
            parent.children.retain(|c| *c != context);
        }
        for id in &subtree {
            self.contexts.remove(id);
        }
        tracing::debug!(%context, removed = subtree.len(), "Hotkey context destroyed");
        true
    }

    /// Contexts on the stack, outermost first.
    pub fn active_stack(&self) -> &[ContextId] {
        &self.stack
    }

    pub fn active_context(&self) -> Option<ContextId> {
        self.stack.last().copied()
    }

    pub fn is_active(&self, context: ContextId) -> bool {
        self.stack.contains(&context)
    }

    fn subtree(&self, root: ContextId) -> Vec<ContextId> {
        let mut found = Vec::new();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if let Some(context) = self.contexts.get(&id) {
                found.push(id);
                pending.extend(context.children.iter().copied());
            }
        }
        found
    }

    fn after_removal(&mut self, removed: &[ContextId]) {
        self.clear_histories();
        if let Some(capture) = self.capture.capture()
            && removed.contains(&capture.owner())
        {
            tracing::debug!(owner = %capture.owner(), "Discarding capture of removed context");
            self.capture = CaptureState::Idle;
        }
    }

    /// The active context followed by its ancestors.
    fn active_chain(&self) -> Vec<ContextId> {
        let mut chain = Vec::new();
        let mut next = self.active_context();
        while let Some(id) = next {
            if chain.contains(&id) {
                break;
            }
            chain.push(id);
            next = self.parent_of(id);
        }
        chain
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Ignore every key until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.clear_histories();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn capture_state(&self) -> &CaptureState {
        &self.capture
    }

    /// Abort an in-progress capture. Returns whether one was active.
    pub fn cancel_capture(&mut self) -> bool {
        let active = !self.capture.is_idle();
        self.capture = CaptureState::Idle;
        active
    }

    /// Recently completed hotkeys, newest first.
    pub fn last_triggered(&self) -> impl Iterator<Item = &TriggerRecord> {
        self.triggered.iter()
    }

    /// Bindings of the active chain grouped by description label.
    pub fn cheat_sheet(&self) -> Vec<CheatSheetGroup> {
        let chain = self.active_chain();
        cheat_sheet::collect(chain.iter().filter_map(|id| self.contexts.get(id)))
    }

    fn clear_histories(&mut self) {
        self.key_down.clear();
        self.key_up.clear();
    }

    fn history(&self, mode: KeyMode) -> &KeyHistory {
        match mode {
            KeyMode::KeyDown => &self.key_down,
            KeyMode::KeyUp => &self.key_up,
        }
    }

    fn record_trigger(&mut self, context: ContextId, trigger: &str, at: Instant) {
        self.triggered.push_front(TriggerRecord {
            context,
            trigger: trigger.to_string(),
            at,
        });
        self.triggered.truncate(MAX_TRIGGERED_HISTORY);
    }

    // ------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------

    /// Route one key event.
    ///
    /// Pending work of a binding with `await_execution(false)` is spawned on
    /// the current Tokio runtime. Outside a runtime it is awaited here instead.
    pub async fn handle_key(&mut self, event: KeyEvent) -> KeyOutcome {
        self.handle_key_at(event, Instant::now()).await
    }

    /// Route one key event observed at `now`.
    pub async fn handle_key_at(&mut self, event: KeyEvent, now: Instant) -> KeyOutcome {
        if self.paused {
            return KeyOutcome::Paused;
        }
        let mode = match event.kind {
            KeyEventKind::Release => KeyMode::KeyUp,
            KeyEventKind::Press | KeyEventKind::Repeat => KeyMode::KeyDown,
        };

        if matches!(self.capture, CaptureState::Accumulating(_)) {
            if mode == KeyMode::KeyUp {
                return KeyOutcome::Ignored;
            }
            return self.feed_capture(event, now).await;
        }

        if matches!(event.code, KeyCode::Modifier(_)) {
            return KeyOutcome::Ignored;
        }

        match mode {
            KeyMode::KeyDown => self.key_down.record(event, now),
            KeyMode::KeyUp => self.key_up.record(event, now),
        }

        let Some(found) = self.find_match(mode) else {
            tracing::debug!(code = ?event.code, modifiers = ?event.modifiers, "No hotkey matched");
            return KeyOutcome::NoMatch;
        };

        if event.kind == KeyEventKind::Repeat && !self.accepts_repeat(&found, now) {
            return KeyOutcome::Blocked;
        }

        if found.clears_history {
            self.clear_histories();
        }

        if let Some(spec) = found.capture {
            self.clear_histories();
            tracing::debug!(context = %found.context, trigger = %found.trigger, "Capture started");
            self.capture = CaptureState::Accumulating(Capture::new(
                found.context,
                found.binding,
                found.trigger.clone(),
                spec,
            ));
            return KeyOutcome::CaptureStarted {
                context: found.context,
                trigger: found.trigger,
            };
        }

        let matched = HotkeyMatch {
            trigger: found.trigger,
            motion_matches: found.motions,
            captured: None,
        };
        self.dispatch(found.context, found.binding, matched, event, now)
            .await
    }

    fn accepts_repeat(&self, found: &Found, now: Instant) -> bool {
        let Some(binding) = self.binding(found.context, found.binding) else {
            return false;
        };
        if !binding.can_repeat {
            return false;
        }
        binding
            .last_fired
            .is_none_or(|last| now.saturating_duration_since(last) >= self.repeat_interval)
    }

    fn binding(&self, context: ContextId, index: usize) -> Option<&Binding<A>> {
        self.contexts.get(&context)?.bindings.get(index)
    }

    fn binding_mut(&mut self, context: ContextId, index: usize) -> Option<&mut Binding<A>> {
        self.contexts.get_mut(&context)?.bindings.get_mut(index)
    }

    /// Best match in the innermost context that has one.
    ///
    /// Within a context the highest specificity wins; ties go to the binding
    /// registered first.
    fn find_match(&self, mode: KeyMode) -> Option<Found> {
        let history = self.history(mode);

        for context_id in self.active_chain() {
            let Some(context) = self.contexts.get(&context_id) else {
                continue;
            };
            let mut best: Option<(u32, Found)> = None;

            for (index, binding) in context.bindings.iter().enumerate() {
                if binding.mode != mode {
                    continue;
                }
                let timeout = binding
                    .consider_time_in_sequence
                    .then_some(self.sequence_timeout);

                for trigger in &binding.triggers {
                    let (motions, capture) = match trigger.pattern() {
                        TriggerPattern::Sequence(fragments) => {
                            (history.match_sequence(fragments, timeout), None)
                        }
                        TriggerPattern::Capture(spec) => {
                            let initializer = [ChordMatcher::Literal(spec.initializer.clone())];
                            (history.match_sequence(&initializer, None), Some(spec.clone()))
                        }
                    };
                    let Some(motions) = motions else {
                        continue;
                    };

                    let score = trigger.specificity();
                    if best.as_ref().is_none_or(|(top, _)| score > *top) {
                        best = Some((
                            score,
                            Found {
                                context: context_id,
                                binding: index,
                                trigger: trigger.source().to_string(),
                                motions,
                                capture,
                                clears_history: trigger.fragment_count() > 1
                                    || trigger.has_motion(),
                            },
                        ));
                    }
                }
            }

            if let Some((score, found)) = best {
                tracing::debug!(
                    context = %context.name,
                    trigger = %found.trigger,
                    specificity = score,
                    "Hotkey matched"
                );
                return Some(found);
            }
        }

        None
    }

    async fn feed_capture(&mut self, event: KeyEvent, now: Instant) -> KeyOutcome {
        let CaptureState::Accumulating(capture) = &mut self.capture else {
            return KeyOutcome::Ignored;
        };
        let step = capture.feed(&event);
        let owner = capture.owner();
        let index = capture.binding;
        let trigger = capture.trigger().to_string();
        let buffer = capture.buffer().to_string();

        match step {
            CaptureStep::Ignored => KeyOutcome::Ignored,
            CaptureStep::Updated => {
                if let Some(binding) = self.binding_mut(owner, index) {
                    (binding.capture_handler)(&buffer);
                }
                KeyOutcome::CaptureUpdated
            }
            CaptureStep::Cancelled => {
                self.capture = CaptureState::Idle;
                tracing::debug!(context = %owner, %trigger, "Capture cancelled");
                KeyOutcome::CaptureCancelled
            }
            CaptureStep::Accepted(text) => {
                self.capture = CaptureState::Dispatching;
                let matched = HotkeyMatch {
                    trigger,
                    motion_matches: Vec::new(),
                    captured: Some(text),
                };
                let outcome = self.dispatch(owner, index, matched, event, now).await;
                if self.capture == CaptureState::Dispatching {
                    self.capture = CaptureState::Idle;
                }
                outcome
            }
        }
    }

    /// Run a binding's handler, apply its requests and settle pending work.
    async fn dispatch(
        &mut self,
        context: ContextId,
        index: usize,
        matched: HotkeyMatch,
        event: KeyEvent,
        now: Instant,
    ) -> KeyOutcome {
        let Some(binding) = self.binding_mut(context, index) else {
            tracing::warn!(%context, trigger = %matched.trigger, "Matched binding no longer exists");
            return KeyOutcome::NoMatch;
        };
        binding.last_fired = Some(now);
        let await_execution = binding.await_execution;
        let trigger = matched.trigger.clone();

        let mut invocation = HotkeyInvocation::new(event, context, matched);
        let result = (binding.handler)(&mut invocation);
        let requests = invocation.take_requests();
        self.record_trigger(context, &trigger, now);

        let dispatch = match result {
            Ok(dispatch) => dispatch,
            Err(e) => {
                tracing::error!(%context, %trigger, error = %e, "Hotkey handler failed");
                if !requests.is_empty() {
                    tracing::warn!(discarded = requests.len(), "Discarding requests of failed handler");
                }
                return KeyOutcome::HandlerFailed { context, trigger };
            }
        };

        self.apply_requests(requests);

        match dispatch {
            Dispatch::Done => KeyOutcome::Dispatched { context, trigger },
            Dispatch::Pending(work) if await_execution => match work.await {
                Ok(()) => KeyOutcome::Dispatched { context, trigger },
                Err(e) => {
                    tracing::error!(%context, %trigger, error = %e, "Hotkey handler failed");
                    KeyOutcome::HandlerFailed { context, trigger }
                }
            },
            Dispatch::Pending(work) => match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let label = trigger.clone();
                    runtime.spawn(async move {
                        if let Err(e) = work.await {
                            tracing::error!(trigger = %label, error = %e, "Background hotkey handler failed");
                        }
                    });
                    KeyOutcome::Dispatched { context, trigger }
                }
                Err(_) => {
                    tracing::warn!(%context, %trigger, "No Tokio runtime, awaiting background handler in place");
                    match work.await {
                        Ok(()) => KeyOutcome::Dispatched { context, trigger },
                        Err(e) => {
                            tracing::error!(%context, %trigger, error = %e, "Hotkey handler failed");
                            KeyOutcome::HandlerFailed { context, trigger }
                        }
                    }
                }
            },
        }
    }

    fn apply_requests(&mut self, requests: Vec<EngineRequest>) {
        for request in requests {
            match request {
                EngineRequest::Pop => {
                    self.pop();
                }
                EngineRequest::Push(context) => {
                    if let Err(e) = self.push(context) {
                        tracing::warn!(%context, error = %e, "Handler push request rejected");
                    }
                }
                EngineRequest::Deactivate(context) => {
                    self.deactivate(context);
                }
                EngineRequest::Destroy(context) => {
                    self.destroy(context);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, KeyModifiers};

    use super::*;

    type Engine = HotkeyEngine<HotkeyAction>;

    fn noop(triggers: &[&str]) -> HotkeyRegistration {
        HotkeyRegistration::new(triggers.iter().copied(), |_| Ok(Dispatch::Done))
    }

    fn char_key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_push_unknown_context_is_noop() {
        let mut engine = Engine::default();
        let ghost = ContextId::new(99);
        assert_eq!(engine.push(ghost), Ok(false));
        assert!(engine.active_stack().is_empty());
    }

    #[test]
    fn test_push_twice_fails() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        assert_eq!(engine.push(root), Ok(true));
        assert!(matches!(
            engine.push(root),
            Err(HotkeyError::AlreadyActive { .. })
        ));
    }

    #[test]
    fn test_child_requires_active_parent() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        let child = engine.create_child_context(root, "child").unwrap();
        assert!(matches!(
            engine.push(child),
            Err(HotkeyError::ParentNotActive { .. })
        ));
        engine.push(root).unwrap();
        assert_eq!(engine.push(child), Ok(true));
        assert_eq!(engine.active_stack(), &[root, child]);
    }

    #[test]
    fn test_child_of_unknown_parent_fails() {
        let mut engine = Engine::default();
        assert!(matches!(
            engine.create_child_context(ContextId::new(5), "orphan"),
            Err(HotkeyError::UnknownContext { .. })
        ));
    }

    #[test]
    fn test_deactivate_removes_descendants() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        let list = engine.create_child_context(root, "list").unwrap();
        let item = engine.create_child_context(list, "item").unwrap();
        let other = engine.create_context("other");
        for id in [root, list, item, other] {
            engine.push(id).unwrap();
        }

        assert!(engine.deactivate(list));
        assert_eq!(engine.active_stack(), &[root, other]);
        assert!(!engine.deactivate(list));
        assert!(engine.contains(item));
    }

    #[test]
    fn test_destroy_drops_subtree() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        let list = engine.create_child_context(root, "list").unwrap();
        let item = engine.create_child_context(list, "item").unwrap();

        assert!(engine.destroy(list));
        assert!(!engine.contains(list));
        assert!(!engine.contains(item));
        assert!(engine.contains(root));
        assert!(!engine.destroy(list));
    }

    #[test]
    fn test_register_on_unknown_context_fails() {
        let mut engine = Engine::default();
        let result = engine.register(ContextId::new(3), noop(&["x"]));
        assert!(matches!(result, Err(HotkeyError::UnknownContext { .. })));
    }

    #[test]
    fn test_set_final_blocks_registration() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        engine.set_final(root).unwrap();
        assert!(engine.is_final(root));
        assert!(matches!(
            engine.register(root, noop(&["x"])),
            Err(HotkeyError::ContextFinalized { .. })
        ));
    }

    #[tokio::test]
    async fn test_paused_engine_ignores_keys() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        engine.register(root, noop(&["x"])).unwrap();
        engine.push(root).unwrap();

        engine.pause();
        assert_eq!(engine.handle_key(char_key('x')).await, KeyOutcome::Paused);
        engine.resume();
        assert!(engine.handle_key(char_key('x')).await.is_handled());
    }

    #[tokio::test]
    async fn test_modifier_only_keys_are_ignored() {
        use crossterm::event::ModifierKeyCode;

        let mut engine = Engine::default();
        let root = engine.create_context("root");
        engine.push(root).unwrap();
        let shift = KeyEvent::new(
            KeyCode::Modifier(ModifierKeyCode::LeftShift),
            KeyModifiers::SHIFT,
        );
        assert_eq!(engine.handle_key(shift).await, KeyOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_repeat_blocked_unless_allowed() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        engine.register(root, noop(&["x"])).unwrap();
        engine
            .register(root, noop(&["j"]).options(super::super::HotkeyOptions::new().can_repeat(true)))
            .unwrap();
        engine.push(root).unwrap();

        let repeat = |c| KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Repeat,
            state: KeyEventState::NONE,
        };
        let start = Instant::now();
        assert_eq!(engine.handle_key_at(repeat('x'), start).await, KeyOutcome::Blocked);

        assert!(engine.handle_key_at(repeat('j'), start).await.is_handled());
        assert_eq!(
            engine
                .handle_key_at(repeat('j'), start + Duration::from_millis(10))
                .await,
            KeyOutcome::Blocked
        );
        assert!(matches!(
            engine
                .handle_key_at(repeat('j'), start + Duration::from_millis(500))
                .await,
            KeyOutcome::Dispatched { .. }
        ));
    }

    #[tokio::test]
    async fn test_trigger_history_is_bounded() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        engine.register(root, noop(&["x"])).unwrap();
        engine.push(root).unwrap();

        for _ in 0..(MAX_TRIGGERED_HISTORY + 5) {
            engine.handle_key(char_key('x')).await;
        }
        assert_eq!(engine.last_triggered().count(), MAX_TRIGGERED_HISTORY);
        assert_eq!(engine.last_triggered().next().map(|r| r.trigger.as_str()), Some("x"));
    }

    #[test]
    fn test_cheat_sheet_groups_and_hides() {
        let mut engine = Engine::default();
        let root = engine.create_context("root");
        let grid = engine.create_child_context(root, "grid").unwrap();
        let opts = super::super::HotkeyOptions::new;
        engine
            .register(root, noop(&["q"]).options(opts().description("<general>Quit")))
            .unwrap();
        engine
            .register(root, noop(&["w"]).options(opts().description("<navigation>Shadowed")))
            .unwrap();
        engine
            .register(grid, noop(&["w"]).options(opts().description("<navigation>Up")))
            .unwrap();
        engine
            .register(grid, HotkeyRegistration::placeholder(["x"]))
            .unwrap();
        engine.push(root).unwrap();
        engine.push(grid).unwrap();

        let sheet = engine.cheat_sheet();
        let labels: Vec<&str> = sheet.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["navigation", "general"]);
        assert_eq!(sheet[0].entries.len(), 1);
        assert_eq!(sheet[0].entries[0].description, "Up");
        assert_eq!(sheet[1].entries[0].context, "root");
    }
}
