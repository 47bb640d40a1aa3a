//! Hotkey contexts and override resolution.

use std::fmt;
use std::hash::Hash;
use std::time::Instant;

use keygrid_config::keybind::{Trigger, parse_trigger};

use super::binding::{
    CaptureHandler, Description, HotkeyHandler, HotkeyRegistration, KeyMode, nullish_handler,
};
use super::error::HotkeyError;

/// Closed set of action identifiers a component family registers bindings for.
pub trait ActionId: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static {}

impl<T> ActionId for T where T: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static {}

/// Handle to a context in the engine's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handler order for [`OverrideBehavior::Wrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapOrder {
    /// The new (wrapping) handler runs before the previous one.
    #[default]
    OuterFirst,
    /// The previous handler runs before the new one.
    InnerFirst,
}

/// How a registration treats an action that is already bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideBehavior {
    /// Keep the existing binding untouched.
    Ignore,
    /// Swap in the new handler; empty triggers and a missing description are inherited.
    Replace,
    /// Run both handlers, once each, in the given order.
    Wrap(WrapOrder),
}

/// Registration of a binding under an action identifier.
#[derive(Debug)]
pub struct ActionRegistration {
    /// `None` makes a second registration of the same action an error.
    pub override_behavior: Option<OverrideBehavior>,
    pub params: HotkeyRegistration,
}

impl ActionRegistration {
    pub fn new(params: HotkeyRegistration) -> Self {
        Self {
            override_behavior: None,
            params,
        }
    }

    pub fn ignore(params: HotkeyRegistration) -> Self {
        Self::new(params).with_override(OverrideBehavior::Ignore)
    }

    pub fn replace(params: HotkeyRegistration) -> Self {
        Self::new(params).with_override(OverrideBehavior::Replace)
    }

    pub fn wrap(params: HotkeyRegistration) -> Self {
        Self::new(params).with_override(OverrideBehavior::Wrap(WrapOrder::default()))
    }

    pub fn with_override(mut self, behavior: OverrideBehavior) -> Self {
        self.override_behavior = Some(behavior);
        self
    }
}

pub(crate) struct Binding<A> {
    pub(crate) action: Option<A>,
    pub(crate) triggers: Vec<Trigger>,
    pub(crate) handler: HotkeyHandler,
    pub(crate) capture_handler: CaptureHandler,
    pub(crate) description: Description,
    pub(crate) mode: KeyMode,
    pub(crate) await_execution: bool,
    pub(crate) can_repeat: bool,
    pub(crate) consider_time_in_sequence: bool,
    pub(crate) last_fired: Option<Instant>,
}

impl<A> Binding<A> {
    fn assemble(
        action: Option<A>,
        triggers: Vec<Trigger>,
        handler: HotkeyHandler,
        capture_handler: CaptureHandler,
        description: Description,
        flags: BindingFlags,
    ) -> Self {
        Self {
            action,
            triggers,
            handler,
            capture_handler,
            description,
            mode: flags.mode,
            await_execution: flags.await_execution,
            can_repeat: flags.can_repeat,
            consider_time_in_sequence: flags.consider_time_in_sequence,
            last_fired: None,
        }
    }
}

#[derive(Clone, Copy)]
struct BindingFlags {
    mode: KeyMode,
    await_execution: bool,
    can_repeat: bool,
    consider_time_in_sequence: bool,
}

/// Parts of a registration after its triggers have been parsed.
struct Parsed {
    triggers: Vec<Trigger>,
    handler: HotkeyHandler,
    capture_handler: Option<CaptureHandler>,
    description: Option<Description>,
    flags: BindingFlags,
}

fn parse(params: HotkeyRegistration) -> Result<Parsed, HotkeyError> {
    let triggers = params
        .triggers
        .iter()
        .map(|source| parse_trigger(source))
        .collect::<Result<Vec<_>, _>>()?;
    let options = params.options;
    Ok(Parsed {
        triggers,
        handler: params.handler,
        capture_handler: options.capture_handler,
        description: options.description.as_deref().map(|d| Description::parse(Some(d))),
        flags: BindingFlags {
            mode: options.mode,
            await_execution: options.await_execution,
            can_repeat: options.can_repeat,
            consider_time_in_sequence: options.consider_time_in_sequence,
        },
    })
}

fn sentinel_capture_handler() -> CaptureHandler {
    Box::new(|_| {})
}

fn wrap_handlers(outer: HotkeyHandler, inner: HotkeyHandler, order: WrapOrder) -> HotkeyHandler {
    let (mut first, mut second) = match order {
        WrapOrder::OuterFirst => (outer, inner),
        WrapOrder::InnerFirst => (inner, outer),
    };
    Box::new(move |invocation| {
        let head = first(invocation)?;
        let tail = second(invocation)?;
        Ok(head.then(tail))
    })
}

fn wrap_capture_handlers(
    outer: CaptureHandler,
    inner: CaptureHandler,
    order: WrapOrder,
) -> CaptureHandler {
    let (mut first, mut second) = match order {
        WrapOrder::OuterFirst => (outer, inner),
        WrapOrder::InnerFirst => (inner, outer),
    };
    Box::new(move |buffer| {
        first(buffer);
        second(buffer);
    })
}

/// A named set of bindings tied to a component's lifetime.
pub(crate) struct HotkeyContext<A> {
    pub(crate) name: String,
    /// Non-owning: resolved through the registry.
    pub(crate) parent: Option<ContextId>,
    pub(crate) children: Vec<ContextId>,
    pub(crate) bindings: Vec<Binding<A>>,
    pub(crate) finalized: bool,
}

impl<A: ActionId> HotkeyContext<A> {
    pub(crate) fn new(name: String, parent: Option<ContextId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            bindings: Vec::new(),
            finalized: false,
        }
    }

    fn ensure_mutable(&self) -> Result<(), HotkeyError> {
        if self.finalized {
            return Err(HotkeyError::ContextFinalized {
                context: self.name.clone(),
            });
        }
        Ok(())
    }

    fn fresh_binding(
        &self,
        action: Option<A>,
        params: HotkeyRegistration,
    ) -> Result<Binding<A>, HotkeyError> {
        let parsed = parse(params)?;
        if parsed.triggers.is_empty() {
            return Err(HotkeyError::NoTriggers {
                context: self.name.clone(),
            });
        }
        Ok(Binding::assemble(
            action,
            parsed.triggers,
            parsed.handler,
            parsed.capture_handler.unwrap_or_else(sentinel_capture_handler),
            parsed.description.unwrap_or_else(|| Description::parse(None)),
            parsed.flags,
        ))
    }

    /// Add a binding without an action identifier.
    pub(crate) fn register(&mut self, params: HotkeyRegistration) -> Result<(), HotkeyError> {
        self.ensure_mutable()?;
        let binding = self.fresh_binding(None, params)?;
        self.bindings.push(binding);
        Ok(())
    }

    /// Add or override the binding for `action`.
    pub(crate) fn register_action(
        &mut self,
        action: A,
        registration: ActionRegistration,
    ) -> Result<(), HotkeyError> {
        self.ensure_mutable()?;
        let ActionRegistration {
            override_behavior,
            params,
        } = registration;

        let Some(index) = self.bindings.iter().position(|b| b.action == Some(action)) else {
            let binding = self.fresh_binding(Some(action), params)?;
            self.bindings.push(binding);
            return Ok(());
        };

        let behavior = match override_behavior {
            None => {
                return Err(HotkeyError::DuplicateAction {
                    context: self.name.clone(),
                    action: action.to_string(),
                });
            }
            Some(OverrideBehavior::Ignore) => {
                tracing::debug!(context = %self.name, %action, "Ignoring override of bound action");
                return Ok(());
            }
            Some(behavior) => behavior,
        };

        let parsed = parse(params)?;
        let existing = &mut self.bindings[index];
        let triggers = if parsed.triggers.is_empty() {
            existing.triggers.clone()
        } else {
            parsed.triggers
        };
        let description = parsed
            .description
            .unwrap_or_else(|| existing.description.clone());
        let previous_capture = std::mem::replace(
            &mut existing.capture_handler,
            sentinel_capture_handler(),
        );

        let (handler, capture_handler) = match behavior {
            OverrideBehavior::Wrap(order) => {
                let previous = std::mem::replace(&mut existing.handler, nullish_handler());
                let capture = match parsed.capture_handler {
                    Some(outer) => wrap_capture_handlers(outer, previous_capture, order),
                    None => previous_capture,
                };
                (wrap_handlers(parsed.handler, previous, order), capture)
            }
            _ => (
                parsed.handler,
                parsed.capture_handler.unwrap_or(previous_capture),
            ),
        };

        tracing::debug!(context = %self.name, %action, ?behavior, "Overriding bound action");
        *existing = Binding::assemble(
            Some(action),
            triggers,
            handler,
            capture_handler,
            description,
            parsed.flags,
        );
        Ok(())
    }

    /// Freeze the binding set. Finalizing twice is an error.
    pub(crate) fn finalize(&mut self) -> Result<(), HotkeyError> {
        self.ensure_mutable()?;
        self.finalized = true;
        Ok(())
    }
}
