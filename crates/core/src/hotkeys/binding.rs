//! Binding declarations, handler types and invocation state.

use std::fmt;
use std::future::Future;

use crossterm::event::KeyEvent;
use futures::FutureExt;
use futures::future::BoxFuture;
use keygrid_config::constants::{DEFAULT_DESCRIPTION, GENERAL_GROUP};

use super::context::ContextId;

/// Description given to placeholder bindings; hidden from the cheat sheet.
pub const NULL_DESCRIPTION: &str = "<hidden>Unassigned";

/// Key transition a binding reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyMode {
    #[default]
    KeyDown,
    KeyUp,
}

/// What a handler leaves behind once its synchronous part has run.
pub enum Dispatch {
    /// Nothing left to do.
    Done,
    /// Asynchronous work, awaited or spawned depending on `await_execution`.
    Pending(BoxFuture<'static, anyhow::Result<()>>),
}

impl Dispatch {
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }

    /// Run `self` then `next`, sequencing pending work in that order.
    pub fn then(self, next: Dispatch) -> Dispatch {
        match (self, next) {
            (Self::Done, next) => next,
            (pending, Self::Done) => pending,
            (Self::Pending(first), Self::Pending(second)) => Self::pending(async move {
                first.await?;
                second.await
            }),
        }
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "Done"),
            Self::Pending(_) => write!(f, "Pending(..)"),
        }
    }
}

pub type HandlerResult = anyhow::Result<Dispatch>;

/// A bound handler.
pub type HotkeyHandler = Box<dyn FnMut(&mut HotkeyInvocation) -> HandlerResult>;

/// Receives the partial buffer on every change during a capture.
pub type CaptureHandler = Box<dyn FnMut(&str)>;

/// A handler that does nothing, used by placeholder bindings.
pub fn nullish_handler() -> HotkeyHandler {
    Box::new(|_| Ok(Dispatch::Done))
}

/// Stack changes a handler asks for; applied once the handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRequest {
    Pop,
    Push(ContextId),
    Deactivate(ContextId),
    Destroy(ContextId),
}

/// What matched: the trigger, its motion counts and the captured text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HotkeyMatch {
    /// Normalized trigger string.
    pub trigger: String,
    /// One integer per `\d` group, in written order.
    pub motion_matches: Vec<u64>,
    /// Text accumulated by a capture trigger.
    pub captured: Option<String>,
}

impl HotkeyMatch {
    /// The first motion count, if the trigger had one.
    pub fn motion(&self) -> Option<u64> {
        self.motion_matches.first().copied()
    }
}

/// Argument passed to a handler.
#[derive(Debug)]
pub struct HotkeyInvocation {
    event: KeyEvent,
    context: ContextId,
    matched: HotkeyMatch,
    requests: Vec<EngineRequest>,
}

impl HotkeyInvocation {
    pub(crate) fn new(event: KeyEvent, context: ContextId, matched: HotkeyMatch) -> Self {
        Self {
            event,
            context,
            matched,
            requests: Vec::new(),
        }
    }

    /// The key event that completed the match.
    pub fn event(&self) -> &KeyEvent {
        &self.event
    }

    /// Context owning the binding.
    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn matched(&self) -> &HotkeyMatch {
        &self.matched
    }

    pub fn request(&mut self, request: EngineRequest) {
        self.requests.push(request);
    }

    pub fn pop(&mut self) {
        self.request(EngineRequest::Pop);
    }

    pub fn push(&mut self, context: ContextId) {
        self.request(EngineRequest::Push(context));
    }

    pub fn deactivate(&mut self, context: ContextId) {
        self.request(EngineRequest::Deactivate(context));
    }

    pub fn destroy(&mut self, context: ContextId) {
        self.request(EngineRequest::Destroy(context));
    }

    pub(crate) fn take_requests(&mut self) -> Vec<EngineRequest> {
        std::mem::take(&mut self.requests)
    }
}

/// A description split into its `<group>` label and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    group: String,
    text: String,
}

impl Description {
    /// Parse `<group>text`. Without a label the group is `general`; a missing
    /// description falls back to the default text.
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = raw.unwrap_or(DEFAULT_DESCRIPTION).trim();
        if let Some(rest) = raw.strip_prefix('<')
            && let Some((group, text)) = rest.split_once('>')
            && !group.trim().is_empty()
        {
            return Self {
                group: group.trim().to_string(),
                text: text.trim().to_string(),
            };
        }
        Self {
            group: GENERAL_GROUP.to_string(),
            text: raw.to_string(),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>{}", self.group, self.text)
    }
}

/// Per-binding options.
///
/// ```
/// use keygrid_core::hotkeys::HotkeyOptions;
///
/// let options = HotkeyOptions::new()
///     .description("<navigation>Move up")
///     .can_repeat(true);
/// assert!(options.await_execution);
/// ```
pub struct HotkeyOptions {
    /// `<group>text`; `None` inherits on override or falls back to the default.
    pub description: Option<String>,
    pub mode: KeyMode,
    /// Await the handler's pending work before handling the next key.
    pub await_execution: bool,
    /// Accept auto-repeat events (throttled).
    pub can_repeat: bool,
    /// Reject sequences whose keystrokes are further apart than the timeout.
    pub consider_time_in_sequence: bool,
    /// Live consumer of the capture buffer.
    pub capture_handler: Option<CaptureHandler>,
}

impl Default for HotkeyOptions {
    fn default() -> Self {
        Self {
            description: None,
            mode: KeyMode::KeyDown,
            await_execution: true,
            can_repeat: false,
            consider_time_in_sequence: false,
            capture_handler: None,
        }
    }
}

impl HotkeyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mode(mut self, mode: KeyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn await_execution(mut self, await_execution: bool) -> Self {
        self.await_execution = await_execution;
        self
    }

    pub fn can_repeat(mut self, can_repeat: bool) -> Self {
        self.can_repeat = can_repeat;
        self
    }

    pub fn consider_time_in_sequence(mut self, consider: bool) -> Self {
        self.consider_time_in_sequence = consider;
        self
    }

    pub fn capture_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.capture_handler = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for HotkeyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyOptions")
            .field("description", &self.description)
            .field("mode", &self.mode)
            .field("await_execution", &self.await_execution)
            .field("can_repeat", &self.can_repeat)
            .field("consider_time_in_sequence", &self.consider_time_in_sequence)
            .field("capture_handler", &self.capture_handler.is_some())
            .finish()
    }
}

/// Triggers, handler and options for one binding.
pub struct HotkeyRegistration {
    /// Trigger strings; empty inherits the previous triggers on override.
    pub triggers: Vec<String>,
    pub handler: HotkeyHandler,
    pub options: HotkeyOptions,
}

impl HotkeyRegistration {
    pub fn new<I, S, F>(triggers: I, handler: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&mut HotkeyInvocation) -> HandlerResult + 'static,
    {
        Self {
            triggers: triggers.into_iter().map(Into::into).collect(),
            handler: Box::new(handler),
            options: HotkeyOptions::default(),
        }
    }

    /// A do-nothing binding reserving `triggers` until a concrete usage
    /// replaces or wraps it.
    pub fn placeholder<I, S>(triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            triggers: triggers.into_iter().map(Into::into).collect(),
            handler: nullish_handler(),
            options: HotkeyOptions::new().description(NULL_DESCRIPTION),
        }
    }

    pub fn options(mut self, options: HotkeyOptions) -> Self {
        self.options = options;
        self
    }
}

impl fmt::Debug for HotkeyRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyRegistration")
            .field("triggers", &self.triggers)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
