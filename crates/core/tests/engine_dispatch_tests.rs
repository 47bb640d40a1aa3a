//! Tests for key dispatch through the hotkey engine.
//!
//! This module tests:
//! - Action overrides (ignore, replace, wrap in both orders)
//! - Context stack fallback through parent contexts
//! - Multi-key sequences and digit motions
//! - String and single character captures
//! - Handler failures, stack requests and unmounting during a capture
//! - Awaited versus spawned pending work
//! - Unawaited pending work outside a Tokio runtime
//!
//! ## Invariants
//! - A failing handler never leaves the engine in capture mode
//! - Stack requests of a failing handler are discarded
//! - Destroying a context discards a capture it owns

mod helpers;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use helpers::*;
use keygrid_config::HotkeyAction;
use keygrid_core::hotkeys::{
    ActionRegistration, CaptureState, Dispatch, HotkeyEngine, HotkeyOptions, HotkeyRegistration,
    KeyMode, KeyOutcome, OverrideBehavior, WrapOrder,
};

type Engine = HotkeyEngine<HotkeyAction>;

fn engine_with_root() -> (Engine, keygrid_core::ContextId) {
    let mut engine = Engine::default();
    let root = engine.create_context("root");
    (engine, root)
}

#[tokio::test]
async fn test_ignore_keeps_existing_handler() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    let action = HotkeyAction::ItemSelection;
    engine
        .register_action(root, action, ActionRegistration::new(log.binding(&["e"], "base")))
        .unwrap();
    engine
        .register_action(root, action, ActionRegistration::ignore(log.binding(&["e"], "new")))
        .unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('e')).await;
    assert_eq!(log.entries(), vec!["base"]);
}

#[tokio::test]
async fn test_replace_inherits_triggers() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    let action = HotkeyAction::ItemDeletion;
    engine
        .register_action(root, action, ActionRegistration::new(log.binding(&["x"], "base")))
        .unwrap();
    engine
        .register_action(root, action, ActionRegistration::replace(log.binding(&[], "new")))
        .unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('x')).await;
    assert_eq!(log.entries(), vec!["new"]);
}

#[tokio::test]
async fn test_wrap_runs_new_handler_first_by_default() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    let action = HotkeyAction::ItemYanking;
    engine
        .register_action(root, action, ActionRegistration::new(log.binding(&["y y"], "base")))
        .unwrap();
    engine
        .register_action(root, action, ActionRegistration::wrap(log.binding(&[], "new")))
        .unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('y')).await;
    engine.handle_key(key('y')).await;
    assert_eq!(log.entries(), vec!["new", "base"]);
}

#[tokio::test]
async fn test_wrap_inner_first() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    let action = HotkeyAction::ItemYanking;
    engine
        .register_action(root, action, ActionRegistration::new(log.binding(&["y"], "base")))
        .unwrap();
    let inner_first = ActionRegistration::new(log.binding(&[], "new"))
        .with_override(OverrideBehavior::Wrap(WrapOrder::InnerFirst));
    engine.register_action(root, action, inner_first).unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('y')).await;
    assert_eq!(log.entries(), vec!["base", "new"]);
}

#[tokio::test]
async fn test_unmatched_key_falls_back_to_parent() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    let list = engine.create_child_context(root, "list").unwrap();
    engine.register(root, log.binding(&["q"], "root-q")).unwrap();
    engine.register(list, log.binding(&["e"], "list-e")).unwrap();
    engine.push(root).unwrap();
    engine.push(list).unwrap();

    let outcome = engine.handle_key(key('q')).await;
    assert_eq!(
        outcome,
        KeyOutcome::Dispatched {
            context: root,
            trigger: "q".to_string()
        }
    );
    engine.handle_key(key('e')).await;
    assert_eq!(log.entries(), vec!["root-q", "list-e"]);
}

#[tokio::test]
async fn test_sibling_below_on_stack_is_not_consulted() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    let dialog = engine.create_context("dialog");
    engine.register(root, log.binding(&["q"], "root-q")).unwrap();
    engine.push(root).unwrap();
    engine.push(dialog).unwrap();

    assert_eq!(engine.handle_key(key('q')).await, KeyOutcome::NoMatch);
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn test_inner_binding_shadows_parent() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    let list = engine.create_child_context(root, "list").unwrap();
    engine.register(root, log.binding(&["q"], "root")).unwrap();
    engine.register(list, log.binding(&["q"], "list")).unwrap();
    engine.push(root).unwrap();
    engine.push(list).unwrap();

    engine.handle_key(key('q')).await;
    assert_eq!(log.entries(), vec!["list"]);
}

#[tokio::test]
async fn test_sequence_needs_every_key() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    engine.register(root, log.binding(&["c c"], "rename")).unwrap();
    engine.push(root).unwrap();

    assert_eq!(engine.handle_key(key('c')).await, KeyOutcome::NoMatch);
    assert!(engine.handle_key(key('c')).await.is_handled());
    // history is cleared after a sequence fires
    assert_eq!(engine.handle_key(key('c')).await, KeyOutcome::NoMatch);
    assert_eq!(log.entries(), vec!["rename"]);
}

#[tokio::test]
async fn test_motion_count_reaches_handler() {
    let (mut engine, root) = engine_with_root();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine
        .register(
            root,
            HotkeyRegistration::new(["\\d g"], move |invocation| {
                sink.borrow_mut()
                    .push(invocation.matched().motion_matches.clone());
                Ok(Dispatch::Done)
            }),
        )
        .unwrap();
    engine.push(root).unwrap();

    for c in ['1', '2', 'g'] {
        engine.handle_key(key(c)).await;
    }
    assert_eq!(*seen.borrow(), vec![vec![12]]);
}

#[tokio::test]
async fn test_more_specific_trigger_wins() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    engine.register(root, log.binding(&["g"], "plain")).unwrap();
    engine.register(root, log.binding(&["\\d g"], "motion")).unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('3')).await;
    engine.handle_key(key('g')).await;
    engine.handle_key(key('g')).await;
    assert_eq!(log.entries(), vec!["motion", "plain"]);
}

#[tokio::test]
async fn test_equal_specificity_prefers_first_registered() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    engine.register(root, log.binding(&["z"], "first")).unwrap();
    engine.register(root, log.binding(&["z"], "second")).unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('z')).await;
    assert_eq!(log.entries(), vec!["first"]);
}

#[tokio::test]
async fn test_string_capture_dispatches_buffer() {
    let (mut engine, root) = engine_with_root();
    let captured = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&captured);
    let live = Rc::new(RefCell::new(Vec::new()));
    let live_sink = Rc::clone(&live);
    let registration = HotkeyRegistration::new(["/ \\s"], move |invocation| {
        *sink.borrow_mut() = invocation.matched().captured.clone();
        Ok(Dispatch::Done)
    })
    .options(
        HotkeyOptions::new()
            .capture_handler(move |buffer| live_sink.borrow_mut().push(buffer.to_string())),
    );
    engine.register(root, registration).unwrap();
    engine.push(root).unwrap();

    assert!(matches!(
        engine.handle_key(key('/')).await,
        KeyOutcome::CaptureStarted { .. }
    ));
    engine.handle_key(key('a')).await;
    engine.handle_key(key('b')).await;
    engine.handle_key(key('x')).await;
    engine.handle_key(backspace_key()).await;
    assert_eq!(engine.capture_state().capture().map(|c| c.buffer()), Some("ab"));

    assert!(matches!(
        engine.handle_key(enter_key()).await,
        KeyOutcome::Dispatched { .. }
    ));
    assert_eq!(captured.borrow().as_deref(), Some("ab"));
    assert_eq!(*live.borrow(), vec!["a", "ab", "abx", "ab"]);
    assert!(engine.capture_state().is_idle());
}

#[tokio::test]
async fn test_capture_cancel_skips_handler() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    engine.register(root, log.binding(&["/ \\s"], "search")).unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('/')).await;
    engine.handle_key(key('a')).await;
    assert_eq!(
        engine.handle_key(esc_key()).await,
        KeyOutcome::CaptureCancelled
    );
    assert!(engine.capture_state().is_idle());
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn test_char_capture_completes_after_one_character() {
    let (mut engine, root) = engine_with_root();
    let captured = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&captured);
    engine
        .register(
            root,
            HotkeyRegistration::new(["` \\c"], move |invocation| {
                *sink.borrow_mut() = invocation.matched().captured.clone();
                Ok(Dispatch::Done)
            }),
        )
        .unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('`')).await;
    assert!(matches!(
        engine.handle_key(key('r')).await,
        KeyOutcome::Dispatched { .. }
    ));
    assert_eq!(captured.borrow().as_deref(), Some("r"));
}

#[tokio::test]
async fn test_failing_capture_handler_leaves_capture_idle() {
    let (mut engine, root) = engine_with_root();
    engine
        .register(
            root,
            HotkeyRegistration::new(["/ \\s"], |_| Err(anyhow::anyhow!("index unavailable"))),
        )
        .unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('/')).await;
    engine.handle_key(key('a')).await;
    assert!(matches!(
        engine.handle_key(enter_key()).await,
        KeyOutcome::HandlerFailed { .. }
    ));
    assert_eq!(*engine.capture_state(), CaptureState::Idle);
}

#[tokio::test]
async fn test_failing_handler_requests_are_discarded() {
    let (mut engine, root) = engine_with_root();
    let dialog = engine.create_context("dialog");
    engine
        .register(
            root,
            HotkeyRegistration::new(["o"], move |invocation| {
                invocation.push(dialog);
                Err(anyhow::anyhow!("dialog failed to load"))
            }),
        )
        .unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('o')).await;
    assert_eq!(engine.active_stack(), &[root]);
}

#[tokio::test]
async fn test_handler_requests_are_applied() {
    let (mut engine, root) = engine_with_root();
    let dialog = engine.create_context("dialog");
    engine
        .register(
            root,
            HotkeyRegistration::new(["o"], move |invocation| {
                invocation.push(dialog);
                Ok(Dispatch::Done)
            }),
        )
        .unwrap();
    engine
        .register(
            dialog,
            HotkeyRegistration::new(["q"], |invocation| {
                invocation.pop();
                Ok(Dispatch::Done)
            }),
        )
        .unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('o')).await;
    assert_eq!(engine.active_context(), Some(dialog));
    engine.handle_key(key('q')).await;
    assert_eq!(engine.active_context(), Some(root));
}

#[tokio::test]
async fn test_destroy_discards_owned_capture() {
    let (mut engine, root) = engine_with_root();
    let search = engine.create_child_context(root, "search").unwrap();
    let log = CallLog::new();
    engine.register(search, log.binding(&["/ \\s"], "search")).unwrap();
    engine.push(root).unwrap();
    engine.push(search).unwrap();

    engine.handle_key(key('/')).await;
    assert!(!engine.capture_state().is_idle());

    assert!(engine.destroy(search));
    assert!(engine.capture_state().is_idle());
    assert_eq!(engine.active_stack(), &[root]);
    assert_eq!(engine.handle_key(enter_key()).await, KeyOutcome::NoMatch);
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn test_push_destroyed_context_is_noop() {
    let (mut engine, root) = engine_with_root();
    assert!(engine.destroy(root));
    assert_eq!(engine.push(root), Ok(false));
    assert!(engine.active_stack().is_empty());
}

#[tokio::test]
async fn test_key_up_bindings_fire_on_release() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    engine
        .register(
            root,
            log.binding(&["h"], "released")
                .options(HotkeyOptions::new().mode(KeyMode::KeyUp)),
        )
        .unwrap();
    engine.push(root).unwrap();

    assert_eq!(engine.handle_key(key('h')).await, KeyOutcome::NoMatch);
    assert!(engine.handle_key(release('h')).await.is_handled());
    assert_eq!(log.entries(), vec!["released"]);
}

#[tokio::test]
async fn test_awaited_pending_work_completes_before_return() {
    let (mut engine, root) = engine_with_root();
    let done = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&done);
    engine
        .register(
            root,
            HotkeyRegistration::new(["r"], move |_| {
                let flag = Arc::clone(&flag);
                Ok(Dispatch::pending(async move {
                    tokio::task::yield_now().await;
                    flag.store(true, Ordering::SeqCst);
                    Ok(())
                }))
            }),
        )
        .unwrap();
    engine.push(root).unwrap();

    engine.handle_key(key('r')).await;
    assert!(done.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_unawaited_pending_work_is_spawned() {
    let (mut engine, root) = engine_with_root();
    let (tx, rx) = tokio::sync::oneshot::channel();
    let tx = RefCell::new(Some(tx));
    engine
        .register(
            root,
            HotkeyRegistration::new(["r"], move |_| {
                let tx = tx.borrow_mut().take();
                Ok(Dispatch::pending(async move {
                    if let Some(tx) = tx {
                        let _ = tx.send("refreshed");
                    }
                    Ok(())
                }))
            })
            .options(HotkeyOptions::new().await_execution(false)),
        )
        .unwrap();
    engine.push(root).unwrap();

    assert!(engine.handle_key(key('r')).await.is_handled());
    assert_eq!(rx.await.unwrap(), "refreshed");
}

#[test]
fn test_unawaited_pending_work_runs_without_runtime() {
    let (mut engine, root) = engine_with_root();
    let done = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&done);
    engine
        .register(
            root,
            HotkeyRegistration::new(["r"], move |_| {
                let flag = Arc::clone(&flag);
                Ok(Dispatch::pending(async move {
                    flag.store(true, Ordering::SeqCst);
                    Ok(())
                }))
            })
            .options(HotkeyOptions::new().await_execution(false)),
        )
        .unwrap();
    engine.push(root).unwrap();

    let outcome = futures::executor::block_on(engine.handle_key(key('r')));
    assert!(outcome.is_handled());
    assert!(done.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_awaited_pending_failure_is_reported() {
    let (mut engine, root) = engine_with_root();
    engine
        .register(
            root,
            HotkeyRegistration::new(["r"], |_| {
                Ok(Dispatch::pending(async { Err(anyhow::anyhow!("timeout")) }))
            }),
        )
        .unwrap();
    engine.push(root).unwrap();

    assert!(matches!(
        engine.handle_key(key('r')).await,
        KeyOutcome::HandlerFailed { .. }
    ));
}

#[tokio::test]
async fn test_shifted_trigger_matches_terminal_report() {
    let (mut engine, root) = engine_with_root();
    let log = CallLog::new();
    engine.register(root, log.binding(&["shift+a"], "row-start")).unwrap();
    engine.register(root, log.binding(&["a"], "left")).unwrap();
    engine.register(root, log.binding(&["ctrl+a"], "select-all")).unwrap();
    engine.push(root).unwrap();

    engine.handle_key(shift_key('A')).await;
    engine.handle_key(key('a')).await;
    engine.handle_key(ctrl_key('a')).await;
    assert_eq!(log.entries(), vec!["row-start", "left", "select-all"]);
}
