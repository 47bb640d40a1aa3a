//! Matching parsed chords against crossterm key events.
//!
//! Bridges `keygrid_config::keybind::ParsedKey` with crossterm's `KeyEvent`.
//! Terminals disagree about how shifted characters are reported (`'A'` with
//! or without `SHIFT`, `'?'` with `SHIFT`), so character chords are compared
//! by the produced character and only ctrl/alt must match exactly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use keygrid_config::keybind::{KeyCodeName, ModifierFlags, ParsedKey, shifted_char};

/// Converts a parsed key into the crossterm key code it produces.
pub fn key_code(name: &KeyCodeName) -> KeyCode {
    match name {
        KeyCodeName::Char(c) => KeyCode::Char(*c),
        KeyCodeName::F(n) => KeyCode::F(*n),
        KeyCodeName::Esc => KeyCode::Esc,
        KeyCodeName::Enter => KeyCode::Enter,
        KeyCodeName::Space => KeyCode::Char(' '),
        KeyCodeName::Tab => KeyCode::Tab,
        KeyCodeName::BackTab => KeyCode::BackTab,
        KeyCodeName::Backspace => KeyCode::Backspace,
        KeyCodeName::Delete => KeyCode::Delete,
        KeyCodeName::Insert => KeyCode::Insert,
        KeyCodeName::Home => KeyCode::Home,
        KeyCodeName::End => KeyCode::End,
        KeyCodeName::PageUp => KeyCode::PageUp,
        KeyCodeName::PageDown => KeyCode::PageDown,
        KeyCodeName::Up => KeyCode::Up,
        KeyCodeName::Down => KeyCode::Down,
        KeyCodeName::Left => KeyCode::Left,
        KeyCodeName::Right => KeyCode::Right,
        KeyCodeName::CapsLock => KeyCode::CapsLock,
        KeyCodeName::NumLock => KeyCode::NumLock,
        KeyCodeName::ScrollLock => KeyCode::ScrollLock,
    }
}

/// Converts ModifierFlags to crossterm KeyModifiers.
pub fn key_modifiers(flags: &ModifierFlags) -> KeyModifiers {
    let mut modifiers = KeyModifiers::NONE;
    if flags.ctrl {
        modifiers |= KeyModifiers::CONTROL;
    }
    if flags.shift {
        modifiers |= KeyModifiers::SHIFT;
    }
    if flags.alt {
        modifiers |= KeyModifiers::ALT;
    }
    modifiers
}

/// The key event a terminal would typically report for `parsed`.
pub fn to_key_event(parsed: &ParsedKey) -> KeyEvent {
    let code = match (&parsed.code, parsed.modifiers.shift) {
        (KeyCodeName::Char(c), true) => KeyCode::Char(shifted_char(*c).unwrap_or(*c)),
        (name, _) => key_code(name),
    };
    KeyEvent::new(code, key_modifiers(&parsed.modifiers))
}

/// Whether `event` satisfies the chord `expected`.
pub fn chord_matches(expected: &ParsedKey, event: &KeyEvent) -> bool {
    let pressed = event.modifiers;
    if pressed.contains(KeyModifiers::CONTROL) != expected.modifiers.ctrl
        || pressed.contains(KeyModifiers::ALT) != expected.modifiers.alt
    {
        return false;
    }

    let shift_pressed = pressed.contains(KeyModifiers::SHIFT);
    match (&expected.code, event.code) {
        (KeyCodeName::Char(want), KeyCode::Char(got)) => {
            if expected.modifiers.shift {
                shifted_char(*want) == Some(got) || (got == *want && shift_pressed)
            } else {
                got == *want
            }
        }
        (KeyCodeName::Space, KeyCode::Char(' ')) => !expected.modifiers.shift || shift_pressed,
        // shift is implied by the key itself
        (KeyCodeName::BackTab, KeyCode::BackTab) => true,
        (name, code) => key_code(name) == code && (!expected.modifiers.shift || shift_pressed),
    }
}

/// The letter carried by a letter key without ctrl or alt.
pub(crate) fn letter_of(event: &KeyEvent) -> Option<char> {
    if event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match event.code {
        KeyCode::Char(c) if c.is_alphabetic() => Some(c),
        _ => None,
    }
}

/// The decimal digit carried by an unmodified digit key.
pub(crate) fn digit_of(event: &KeyEvent) -> Option<u8> {
    if event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match event.code {
        KeyCode::Char(c) => c.to_digit(10).and_then(|d| u8::try_from(d).ok()),
        _ => None,
    }
}

/// The character an event types into a capture buffer, if any.
pub(crate) fn typed_char(event: &KeyEvent) -> Option<char> {
    if event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match event.code {
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}
