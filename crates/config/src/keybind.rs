//! Trigger grammar: parsing and validation.
//!
//! Responsibilities:
//! - Parse human-readable chords ("ctrl+x", "shift+a", "F1") into structured keys.
//! - Parse whitespace-separated trigger strings ("c c", "\d g", "/ \s enter")
//!   into chord matchers or capture specifications.
//! - Validate groups of action triggers for conflicts and invalid syntax.
//!
//! Does NOT handle:
//! - Integration with crossterm (that's in the core crate).
//! - Runtime key event matching.
//!
//! Invariants:
//! - Modifier names are case-insensitive; character keys are case-sensitive.
//! - `\d` may appear anywhere in a sequence except the last position.
//! - `\s` / `\c` only appear as the second fragment of a capture trigger.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    CHAR_METAKEY, DEFAULT_CAPTURE_ACCEPT, DEFAULT_CAPTURE_CANCEL, DIGITS_METAKEY, LETTER_METAKEY,
    STRING_METAKEY,
};
use crate::types::keybind::HotkeyAction;

/// Errors that can occur when parsing or validating triggers.
#[derive(Debug, Error, PartialEq)]
pub enum KeybindError {
    /// Invalid key syntax
    #[error("Invalid key syntax: '{key}'. Expected format like 'q', 'ctrl+x', 'shift+tab', 'F1'")]
    InvalidSyntax {
        /// The invalid key string
        key: String,
    },

    /// Unknown key name
    #[error("Unknown key name: '{name}'")]
    UnknownKey {
        /// The unknown key name
        name: String,
    },

    /// Blank trigger string
    #[error("Trigger is empty")]
    EmptyTrigger,

    /// A capture trigger that does not follow `initializer \s|\c [terminator]`
    #[error("Invalid capture trigger '{trigger}': {reason}")]
    InvalidCapture {
        /// The offending trigger
        trigger: String,
        /// What is wrong with it
        reason: String,
    },

    /// A digit metakey that is not followed by a finalizing key
    #[error("Invalid motion trigger '{trigger}': {reason}")]
    InvalidMotion {
        /// The offending trigger
        trigger: String,
        /// What is wrong with it
        reason: String,
    },

    /// Conflicting triggers
    #[error("Conflicting triggers: '{key}' is assigned to both {action1} and {action2}")]
    Conflict {
        /// The conflicting trigger
        key: String,
        /// First action using this trigger
        action1: String,
        /// Second action using this trigger
        action2: String,
    },
}

/// A parsed key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedKey {
    /// The key code name (for cross-crate compatibility, we use strings)
    pub code: KeyCodeName,
    /// Modifier flags
    pub modifiers: ModifierFlags,
}

impl ParsedKey {
    /// A key without modifiers.
    pub fn plain(code: KeyCodeName) -> Self {
        Self {
            code,
            modifiers: ModifierFlags::default(),
        }
    }

    /// Weight of this chord when ranking competing matches.
    ///
    /// One point for the chord itself plus one per modifier, plus one when
    /// an uppercase letter is written explicitly.
    pub fn specificity(&self) -> u32 {
        let mut score = 1;
        score += u32::from(self.modifiers.ctrl);
        score += u32::from(self.modifiers.shift);
        score += u32::from(self.modifiers.alt);
        if let KeyCodeName::Char(c) = self.code
            && c.is_uppercase()
        {
            score += 1;
        }
        score
    }

    /// Whether this key produces a printable character when typed.
    pub fn is_character(&self) -> bool {
        matches!(self.code, KeyCodeName::Char(_) | KeyCodeName::Space)
            && !self.modifiers.ctrl
            && !self.modifiers.alt
    }
}

impl fmt::Display for ParsedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers == ModifierFlags::default() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}+{}", self.modifiers, self.code)
        }
    }
}

/// Key code names that can be parsed from config strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCodeName {
    /// A character key (e.g., 'a', '1', '?')
    Char(char),
    /// Function key F1-F20
    F(u8),
    /// Escape key
    Esc,
    /// Enter/Return key
    Enter,
    /// Space key
    Space,
    /// Tab key
    Tab,
    /// BackTab (Shift+Tab) key
    BackTab,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Insert key
    Insert,
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// Up arrow key
    Up,
    /// Down arrow key
    Down,
    /// Left arrow key
    Left,
    /// Right arrow key
    Right,
    /// Caps Lock key
    CapsLock,
    /// Num Lock key
    NumLock,
    /// Scroll Lock key
    ScrollLock,
}

impl fmt::Display for KeyCodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c),
            Self::F(n) => write!(f, "F{}", n),
            Self::Esc => write!(f, "Esc"),
            Self::Enter => write!(f, "Enter"),
            Self::Space => write!(f, "Space"),
            Self::Tab => write!(f, "Tab"),
            Self::BackTab => write!(f, "BackTab"),
            Self::Backspace => write!(f, "Backspace"),
            Self::Delete => write!(f, "Delete"),
            Self::Insert => write!(f, "Insert"),
            Self::Home => write!(f, "Home"),
            Self::End => write!(f, "End"),
            Self::PageUp => write!(f, "PageUp"),
            Self::PageDown => write!(f, "PageDown"),
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::CapsLock => write!(f, "CapsLock"),
            Self::NumLock => write!(f, "NumLock"),
            Self::ScrollLock => write!(f, "ScrollLock"),
        }
    }
}

/// Modifier flags for key combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ModifierFlags {
    /// Control (or Cmd) key pressed
    pub ctrl: bool,
    /// Shift key pressed
    pub shift: bool,
    /// Alt/Option key pressed
    pub alt: bool,
}

impl fmt::Display for ModifierFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.alt {
            parts.push("Alt");
        }
        if parts.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", parts.join("+"))
        }
    }
}

/// One fragment of a key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordMatcher {
    /// A literal chord such as `g` or `ctrl+x`.
    Literal(ParsedKey),
    /// One or more digit keys, exposed to handlers as a motion count.
    Digits,
    /// Any single letter key.
    Letter,
}

impl ChordMatcher {
    /// Weight of this fragment when ranking competing matches.
    pub fn specificity(&self) -> u32 {
        match self {
            Self::Literal(key) => key.specificity(),
            Self::Digits => 5,
            Self::Letter => 0,
        }
    }
}

/// How many characters a capture accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// `\s`: any number of characters until a terminator.
    String,
    /// `\c`: exactly one character.
    Char,
}

/// A parsed `initializer \s|\c [terminator]` trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSpec {
    /// Chord that starts the capture.
    pub initializer: ParsedKey,
    /// String or single-character capture.
    pub mode: CaptureMode,
    /// Chord that completes the capture.
    pub accept: ParsedKey,
    /// Chord that aborts the capture.
    pub cancel: ParsedKey,
}

impl CaptureSpec {
    /// Characters after which the capture completes on its own.
    pub fn max_len(&self) -> Option<usize> {
        match self.mode {
            CaptureMode::String => None,
            CaptureMode::Char => Some(1),
        }
    }
}

/// Structural form of a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerPattern {
    /// A sequence of chords and digit motions, matched against key history.
    Sequence(Vec<ChordMatcher>),
    /// A capture that accumulates typed characters.
    Capture(CaptureSpec),
}

/// A trigger string parsed once at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    source: String,
    pattern: TriggerPattern,
}

impl Trigger {
    /// The normalized trigger string (fragments joined by single spaces).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pattern(&self) -> &TriggerPattern {
        &self.pattern
    }

    pub fn is_capture(&self) -> bool {
        matches!(self.pattern, TriggerPattern::Capture(_))
    }

    /// Whether the sequence contains a digit motion.
    pub fn has_motion(&self) -> bool {
        match &self.pattern {
            TriggerPattern::Sequence(fragments) => fragments.contains(&ChordMatcher::Digits),
            TriggerPattern::Capture(_) => false,
        }
    }

    /// Number of fragments in a sequence; a capture counts as its initializer.
    pub fn fragment_count(&self) -> usize {
        match &self.pattern {
            TriggerPattern::Sequence(fragments) => fragments.len(),
            TriggerPattern::Capture(_) => 1,
        }
    }

    /// Sum of the fragment weights; higher wins when several triggers match.
    pub fn specificity(&self) -> u32 {
        match &self.pattern {
            TriggerPattern::Sequence(fragments) => {
                fragments.iter().map(ChordMatcher::specificity).sum()
            }
            TriggerPattern::Capture(spec) => spec.initializer.specificity(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl FromStr for Trigger {
    type Err = KeybindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_trigger(s)
    }
}

/// Parse a key string like "ctrl+x", "F1", "shift+tab" into structured form.
///
/// # Examples
///
/// ```
/// use keygrid_config::keybind::{parse_key, KeyCodeName, ModifierFlags};
///
/// let key = parse_key("ctrl+x").unwrap();
/// assert!(matches!(key.code, KeyCodeName::Char('x')));
/// assert!(key.modifiers.ctrl);
///
/// let key = parse_key("F1").unwrap();
/// assert!(matches!(key.code, KeyCodeName::F(1)));
/// ```
pub fn parse_key(key_str: &str) -> Result<ParsedKey, KeybindError> {
    let key_str = key_str.trim();

    if key_str.is_empty() {
        return Err(KeybindError::InvalidSyntax {
            key: key_str.to_string(),
        });
    }

    if key_str == "+" {
        return Ok(ParsedKey::plain(KeyCodeName::Char('+')));
    }

    // "ctrl++" binds the plus key itself
    let (modifier_part, plus_key) = match key_str.strip_suffix("++") {
        Some(prefix) => (prefix, true),
        None => (key_str, false),
    };

    let parts: Vec<&str> = modifier_part.split('+').map(|s| s.trim()).collect();

    let mut modifiers = ModifierFlags::default();
    let mut key_name = "";

    for part in &parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "cmd" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" | "opt" | "option" => modifiers.alt = true,
            _ => {
                if key_name.is_empty() && !plus_key {
                    key_name = part;
                } else {
                    // Multiple non-modifier parts is invalid
                    return Err(KeybindError::InvalidSyntax {
                        key: key_str.to_string(),
                    });
                }
            }
        }
    }

    let code = if plus_key {
        KeyCodeName::Char('+')
    } else if key_name.is_empty() {
        return Err(KeybindError::InvalidSyntax {
            key: key_str.to_string(),
        });
    } else {
        parse_key_code(key_name)?
    };

    // Handle special case: shift+tab should be BackTab
    let code = if matches!(code, KeyCodeName::Tab) && modifiers.shift {
        KeyCodeName::BackTab
    } else {
        code
    };

    Ok(ParsedKey { code, modifiers })
}

/// Parse a key code name (without modifiers).
fn parse_key_code(name: &str) -> Result<KeyCodeName, KeybindError> {
    let name_lower = name.to_ascii_lowercase();

    match name_lower.as_str() {
        "esc" | "escape" => return Ok(KeyCodeName::Esc),
        "enter" | "return" => return Ok(KeyCodeName::Enter),
        "space" => return Ok(KeyCodeName::Space),
        "tab" => return Ok(KeyCodeName::Tab),
        "backtab" => return Ok(KeyCodeName::BackTab),
        "backspace" => return Ok(KeyCodeName::Backspace),
        "delete" | "del" => return Ok(KeyCodeName::Delete),
        "insert" | "ins" => return Ok(KeyCodeName::Insert),
        "home" => return Ok(KeyCodeName::Home),
        "end" => return Ok(KeyCodeName::End),
        "pageup" | "page_up" | "pgup" => return Ok(KeyCodeName::PageUp),
        "pagedown" | "page_down" | "pgdn" | "pgdown" => return Ok(KeyCodeName::PageDown),
        "up" => return Ok(KeyCodeName::Up),
        "down" => return Ok(KeyCodeName::Down),
        "left" => return Ok(KeyCodeName::Left),
        "right" => return Ok(KeyCodeName::Right),
        "caps" | "capslock" => return Ok(KeyCodeName::CapsLock),
        "num" | "numlock" => return Ok(KeyCodeName::NumLock),
        "scroll" | "scrolllock" => return Ok(KeyCodeName::ScrollLock),
        _ => {}
    }

    // Check for function keys (F1-F20)
    if let Some(num_str) = name_lower.strip_prefix('f')
        && let Ok(num) = num_str.parse::<u8>()
        && (1..=20).contains(&num)
    {
        return Ok(KeyCodeName::F(num));
    }

    let chars: Vec<char> = name.chars().collect();
    if chars.len() == 1 {
        return Ok(KeyCodeName::Char(chars[0]));
    }

    Err(KeybindError::UnknownKey {
        name: name.to_string(),
    })
}

/// Parse a trigger string into a chord sequence or capture specification.
///
/// Fragments are separated by whitespace. `\d` stands for one or more
/// digits and `\l` for any letter. `\s` captures a free-form string, `\c`
/// a single character.
///
/// # Examples
///
/// ```
/// use keygrid_config::keybind::{parse_trigger, ChordMatcher, TriggerPattern};
///
/// let trigger = parse_trigger("\\d g").unwrap();
/// assert!(trigger.has_motion());
///
/// let trigger = parse_trigger("/ \\s").unwrap();
/// assert!(trigger.is_capture());
/// ```
pub fn parse_trigger(trigger: &str) -> Result<Trigger, KeybindError> {
    let fragments: Vec<&str> = trigger.split_whitespace().collect();
    if fragments.is_empty() {
        return Err(KeybindError::EmptyTrigger);
    }
    let source = fragments.join(" ");

    let is_capture = fragments
        .iter()
        .any(|f| *f == STRING_METAKEY || *f == CHAR_METAKEY);

    let pattern = if is_capture {
        TriggerPattern::Capture(parse_capture(&source, &fragments)?)
    } else {
        TriggerPattern::Sequence(parse_sequence(&source, &fragments)?)
    };

    Ok(Trigger { source, pattern })
}

fn parse_sequence(source: &str, fragments: &[&str]) -> Result<Vec<ChordMatcher>, KeybindError> {
    let mut matchers = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if *fragment == DIGITS_METAKEY {
            if matches!(matchers.last(), Some(ChordMatcher::Digits)) {
                return Err(KeybindError::InvalidMotion {
                    trigger: source.to_string(),
                    reason: "consecutive digit metakeys are ambiguous".to_string(),
                });
            }
            matchers.push(ChordMatcher::Digits);
        } else if *fragment == LETTER_METAKEY {
            matchers.push(ChordMatcher::Letter);
        } else {
            matchers.push(ChordMatcher::Literal(parse_key(fragment)?));
        }
    }

    if matches!(matchers.last(), Some(ChordMatcher::Digits)) {
        return Err(KeybindError::InvalidMotion {
            trigger: source.to_string(),
            reason: "a digit metakey must be followed by a finalizing key".to_string(),
        });
    }

    Ok(matchers)
}

fn parse_capture(source: &str, fragments: &[&str]) -> Result<CaptureSpec, KeybindError> {
    let invalid = |reason: &str| KeybindError::InvalidCapture {
        trigger: source.to_string(),
        reason: reason.to_string(),
    };

    if !(2..=3).contains(&fragments.len()) {
        return Err(invalid(
            "expected 'initializer \\s [terminator]' or 'initializer \\c'",
        ));
    }

    let mode = match fragments[1] {
        STRING_METAKEY => CaptureMode::String,
        CHAR_METAKEY => CaptureMode::Char,
        _ => return Err(invalid("the capture metakey must be the second fragment")),
    };

    let is_metakey = |f: &str| {
        [STRING_METAKEY, CHAR_METAKEY, DIGITS_METAKEY, LETTER_METAKEY].contains(&f)
    };
    if is_metakey(fragments[0]) {
        return Err(invalid("the initializer must be a concrete key"));
    }
    let initializer = parse_key(fragments[0])?;

    let accept = match fragments.get(2) {
        Some(terminator) if is_metakey(terminator) => {
            return Err(invalid("the terminator must be a concrete key"));
        }
        Some(terminator) => parse_key(terminator)?,
        None => parse_key(DEFAULT_CAPTURE_ACCEPT)?,
    };
    let cancel = parse_key(DEFAULT_CAPTURE_CANCEL)?;

    if accept == cancel {
        return Err(invalid("the terminator cannot be the cancel key"));
    }

    Ok(CaptureSpec {
        initializer,
        mode,
        accept,
        cancel,
    })
}

/// The character a US keyboard produces for `c` when shift is held.
///
/// Returns `None` for keys without a shifted variant.
pub fn shifted_char(c: char) -> Option<char> {
    if c.is_ascii_lowercase() {
        return Some(c.to_ascii_uppercase());
    }
    let shifted = match c {
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        ';' => ':',
        '\'' => '"',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        '`' => '~',
        _ => return None,
    };
    Some(shifted)
}

/// Validate a set of action triggers for syntax errors and conflicts.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use keygrid_config::keybind::validate_action_triggers;
/// use keygrid_config::types::HotkeyAction;
///
/// let mut triggers = BTreeMap::new();
/// triggers.insert(HotkeyAction::QuitContext, vec!["q".to_string()]);
/// triggers.insert(HotkeyAction::ToggleCheatSheet, vec!["?".to_string()]);
///
/// assert!(validate_action_triggers(&triggers).is_ok());
/// ```
pub fn validate_action_triggers(
    triggers: &std::collections::BTreeMap<HotkeyAction, Vec<String>>,
) -> Result<(), KeybindError> {
    let mut trigger_to_action: HashMap<String, HotkeyAction> = HashMap::new();

    for (action, trigger_strs) in triggers {
        for trigger_str in trigger_strs {
            let parsed = parse_trigger(trigger_str).map_err(|e| KeybindError::InvalidSyntax {
                key: format!("{} for action '{}': {}", trigger_str, action, e),
            })?;

            let normalized = normalize_trigger(parsed.source());
            if let Some(existing_action) = trigger_to_action.get(&normalized)
                && existing_action != action
            {
                return Err(KeybindError::Conflict {
                    key: trigger_str.clone(),
                    action1: existing_action.to_string(),
                    action2: action.to_string(),
                });
            }
            trigger_to_action.insert(normalized, *action);
        }
    }

    Ok(())
}

/// Normalize a trigger string for comparison.
/// Lowercases modifier names and removes spaces around '+'.
fn normalize_trigger(trigger: &str) -> String {
    trigger
        .split_whitespace()
        .map(|fragment| {
            fragment
                .split('+')
                .map(|part| {
                    let part = part.trim();
                    let lower = part.to_ascii_lowercase();
                    if part.chars().count() == 1 {
                        part.to_string()
                    } else {
                        lower
                    }
                })
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_simple_char() {
        let key = parse_key("q").unwrap();
        assert_eq!(key.code, KeyCodeName::Char('q'));
        assert_eq!(key.modifiers, ModifierFlags::default());
    }

    #[test]
    fn test_parse_modifier_aliases() {
        let key = parse_key("cmd+x").unwrap();
        assert!(key.modifiers.ctrl);

        let key = parse_key("opt+x").unwrap();
        assert!(key.modifiers.alt);

        let key = parse_key("Ctrl+Shift+Alt+x").unwrap();
        assert!(key.modifiers.ctrl && key.modifiers.shift && key.modifiers.alt);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_key("esc").unwrap().code, KeyCodeName::Esc);
        assert_eq!(parse_key("Enter").unwrap().code, KeyCodeName::Enter);
        assert_eq!(parse_key("space").unwrap().code, KeyCodeName::Space);
        assert_eq!(parse_key("del").unwrap().code, KeyCodeName::Delete);
        assert_eq!(parse_key("ins").unwrap().code, KeyCodeName::Insert);
        assert_eq!(parse_key("pgup").unwrap().code, KeyCodeName::PageUp);
        assert_eq!(parse_key("pgdown").unwrap().code, KeyCodeName::PageDown);
        assert_eq!(parse_key("caps").unwrap().code, KeyCodeName::CapsLock);
        assert_eq!(parse_key("num").unwrap().code, KeyCodeName::NumLock);
        assert_eq!(parse_key("scroll").unwrap().code, KeyCodeName::ScrollLock);
        assert_eq!(parse_key("f12").unwrap().code, KeyCodeName::F(12));
    }

    #[test]
    fn test_parse_invalid_function_key() {
        assert!(parse_key("F0").is_err());
        assert!(parse_key("F21").is_err());
    }

    #[test]
    fn test_parse_plus_key() {
        assert_eq!(parse_key("+").unwrap().code, KeyCodeName::Char('+'));

        let key = parse_key("ctrl++").unwrap();
        assert_eq!(key.code, KeyCodeName::Char('+'));
        assert!(key.modifiers.ctrl);
    }

    #[test]
    fn test_parse_shift_tab() {
        let key = parse_key("shift+tab").unwrap();
        assert_eq!(key.code, KeyCodeName::BackTab);
        assert!(key.modifiers.shift);
    }

    #[test]
    fn test_invalid_syntax_only_modifiers() {
        let result = parse_key("ctrl+shift");
        assert!(matches!(result, Err(KeybindError::InvalidSyntax { .. })));
    }

    #[test]
    fn test_unknown_key() {
        let result = parse_key("ctrl+unknown");
        assert!(matches!(result, Err(KeybindError::UnknownKey { .. })));
    }

    #[test]
    fn test_parse_sequence_trigger() {
        let trigger = parse_trigger("c  c").unwrap();
        assert_eq!(trigger.source(), "c c");
        assert_eq!(trigger.fragment_count(), 2);
        assert_eq!(
            trigger.pattern(),
            &TriggerPattern::Sequence(vec![
                ChordMatcher::Literal(ParsedKey::plain(KeyCodeName::Char('c'))),
                ChordMatcher::Literal(ParsedKey::plain(KeyCodeName::Char('c'))),
            ])
        );
    }

    #[test]
    fn test_parse_motion_trigger() {
        let trigger = parse_trigger("\\d g").unwrap();
        assert!(trigger.has_motion());
        assert_eq!(trigger.specificity(), 6);
    }

    #[test]
    fn test_parse_letter_metakey() {
        let trigger = parse_trigger("m \\l").unwrap();
        assert_eq!(
            trigger.pattern(),
            &TriggerPattern::Sequence(vec![
                ChordMatcher::Literal(ParsedKey::plain(KeyCodeName::Char('m'))),
                ChordMatcher::Letter,
            ])
        );
        assert!(!trigger.has_motion());
        assert_eq!(trigger.specificity(), 1);
        assert!(matches!(
            parse_trigger("\\l \\c"),
            Err(KeybindError::InvalidCapture { .. })
        ));
    }

    #[test]
    fn test_motion_must_be_finalized() {
        assert!(matches!(
            parse_trigger("g \\d"),
            Err(KeybindError::InvalidMotion { .. })
        ));
        assert!(matches!(
            parse_trigger("\\d \\d g"),
            Err(KeybindError::InvalidMotion { .. })
        ));
    }

    #[test]
    fn test_parse_string_capture_default_terminators() {
        let trigger = parse_trigger("/ \\s").unwrap();
        let TriggerPattern::Capture(spec) = trigger.pattern() else {
            panic!("expected capture");
        };
        assert_eq!(spec.initializer.code, KeyCodeName::Char('/'));
        assert_eq!(spec.mode, CaptureMode::String);
        assert_eq!(spec.accept.code, KeyCodeName::Enter);
        assert_eq!(spec.cancel.code, KeyCodeName::Esc);
        assert_eq!(spec.max_len(), None);
    }

    #[test]
    fn test_parse_char_capture_with_terminator() {
        let trigger = parse_trigger("` \\c tab").unwrap();
        let TriggerPattern::Capture(spec) = trigger.pattern() else {
            panic!("expected capture");
        };
        assert_eq!(spec.mode, CaptureMode::Char);
        assert_eq!(spec.accept.code, KeyCodeName::Tab);
        assert_eq!(spec.max_len(), Some(1));
    }

    #[test]
    fn test_invalid_capture_shapes() {
        for bad in ["\\s", "\\s /", "/ x \\s", "/ \\s enter x", "\\d \\s", "/ \\s esc"] {
            assert!(
                matches!(parse_trigger(bad), Err(KeybindError::InvalidCapture { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_trigger() {
        assert_eq!(parse_trigger("   "), Err(KeybindError::EmptyTrigger));
    }

    #[test]
    fn test_specificity_counts_modifiers_and_uppercase() {
        assert_eq!(parse_key("a").unwrap().specificity(), 1);
        assert_eq!(parse_key("A").unwrap().specificity(), 2);
        assert_eq!(parse_key("shift+a").unwrap().specificity(), 2);
        assert_eq!(parse_key("ctrl+alt+a").unwrap().specificity(), 3);
    }

    #[test]
    fn test_shifted_char_us_layout() {
        assert_eq!(shifted_char('a'), Some('A'));
        assert_eq!(shifted_char('1'), Some('!'));
        assert_eq!(shifted_char('/'), Some('?'));
        assert_eq!(shifted_char('A'), None);
    }

    #[test]
    fn test_validate_conflicts() {
        let mut triggers = BTreeMap::new();
        triggers.insert(HotkeyAction::QuitContext, vec!["q".to_string()]);
        triggers.insert(HotkeyAction::ItemSelection, vec!["q".to_string()]);

        let result = validate_action_triggers(&triggers);
        assert!(matches!(result, Err(KeybindError::Conflict { .. })));
    }

    #[test]
    fn test_validate_case_distinguishes_triggers() {
        let mut triggers = BTreeMap::new();
        triggers.insert(HotkeyAction::QuitContext, vec!["q".to_string()]);
        triggers.insert(HotkeyAction::ItemSelection, vec!["Q".to_string()]);

        assert!(validate_action_triggers(&triggers).is_ok());
    }

    #[test]
    fn test_validate_invalid_syntax() {
        let mut triggers = BTreeMap::new();
        triggers.insert(HotkeyAction::QuitContext, vec!["ctrl+nope".to_string()]);

        let result = validate_action_triggers(&triggers);
        assert!(matches!(result, Err(KeybindError::InvalidSyntax { .. })));
    }

    #[test]
    fn test_normalize_trigger() {
        assert_eq!(normalize_trigger("CTRL+x"), "ctrl+x");
        assert_eq!(normalize_trigger("Shift+A  b"), "shift+A b");
        assert_eq!(normalize_trigger("F1"), "f1");
    }

    #[test]
    fn test_display_parsed_key() {
        assert_eq!(parse_key("ctrl+x").unwrap().to_string(), "Ctrl+x");
        assert_eq!(parse_key("enter").unwrap().to_string(), "Enter");
    }
}
