//! Mode-aware key binding tables.
//!
//! Each mode owns an ordered list of bindings. A binding matches an event
//! when the key code and all four modifier flags are equal. Tables are
//! checked for duplicate chords when a [`Keymap`] is built, so resolution
//! never has to pick between two bindings.

mod action;
pub mod chord;
mod defaults;

pub use action::{Action, Placement};
pub use chord::{parse_chord, parse_script};

use crate::error::OutlineError;
use std::fmt;

/// Editing mode of the dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
        }
    }
}

/// Modifier flags held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub meta: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        meta: false,
        alt: false,
        ctrl: false,
        shift: false,
    };
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// True when a held modifier turns a printable key into a command.
    pub fn is_command(&self) -> bool {
        self.meta || self.ctrl
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (held, name) in [
            (self.meta, "Meta+"),
            (self.ctrl, "Ctrl+"),
            (self.alt, "Alt+"),
            (self.shift, "Shift+"),
        ] {
            if held {
                f.write_str(name)?;
            }
        }
        Ok(())
    }
}

/// Physical key, independent of the text it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A letter key, stored lowercase.
    Letter(char),
    Digit(u8),
    /// Any other printable key, by its unshifted char.
    Symbol(char),
    Space,
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Letter(ch) => write!(f, "{ch}"),
            KeyCode::Digit(digit) => write!(f, "{digit}"),
            KeyCode::Symbol(ch) => write!(f, "{ch}"),
            KeyCode::Space => f.write_str("Space"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Escape => f.write_str("Esc"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Delete => f.write_str("Delete"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
        }
    }
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    /// Text produced by the press, if any.
    pub text: Option<char>,
}

impl KeyEvent {
    /// A press with no text payload.
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        let text = match (code, modifiers.shift) {
            (KeyCode::Letter(ch), false) => Some(ch),
            (KeyCode::Letter(ch), true) => Some(ch.to_ascii_uppercase()),
            (KeyCode::Space, _) => Some(' '),
            _ => None,
        };
        Self {
            code,
            modifiers,
            text,
        }
    }

    /// The press that types `ch` on a plain keyboard.
    pub fn typed(ch: char) -> Self {
        let (code, shift) = if ch.is_ascii_alphabetic() {
            (KeyCode::Letter(ch.to_ascii_lowercase()), ch.is_ascii_uppercase())
        } else if let Some(digit) = ch.to_digit(10) {
            (KeyCode::Digit(digit as u8), false)
        } else if ch == ' ' {
            (KeyCode::Space, false)
        } else {
            (KeyCode::Symbol(ch), false)
        };
        Self {
            code,
            modifiers: Modifiers {
                shift,
                ..Modifiers::NONE
            },
            text: Some(ch),
        }
    }

    /// The char to insert when the event is unbound in insert mode.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.is_command() {
            return None;
        }
        self.text.filter(|ch| !ch.is_control())
    }

    pub fn chord(&self) -> String {
        format!("{}{}", self.modifiers, self.code)
    }
}

/// One entry of a binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub action: Action,
}

impl Binding {
    pub const fn new(code: KeyCode, modifiers: Modifiers, action: Action) -> Self {
        Self {
            code,
            modifiers,
            action,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.code == event.code && self.modifiers == event.modifiers
    }

    pub fn chord(&self) -> String {
        format!("{}{}", self.modifiers, self.code)
    }
}

/// Ordered binding tables for both modes.
#[derive(Debug, Clone)]
pub struct Keymap {
    normal: Vec<Binding>,
    insert: Vec<Binding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::standard()
    }
}

impl Keymap {
    /// Build a keymap, rejecting tables where two bindings share a chord.
    ///
    /// # Errors
    /// Returns [`OutlineError::AmbiguousBinding`] naming the first duplicate.
    pub fn new(normal: Vec<Binding>, insert: Vec<Binding>) -> Result<Self, OutlineError> {
        validate(Mode::Normal, &normal)?;
        validate(Mode::Insert, &insert)?;
        Ok(Self { normal, insert })
    }

    /// The built-in bindings.
    pub fn standard() -> Self {
        Self {
            normal: defaults::normal_bindings(),
            insert: defaults::insert_bindings(),
        }
    }

    pub fn bindings(&self, mode: Mode) -> &[Binding] {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Insert => &self.insert,
        }
    }

    /// Find the action bound to `event` in `mode`.
    ///
    /// # Errors
    /// Returns [`OutlineError::AmbiguousBinding`] if more than one binding
    /// matches.
    pub fn resolve(&self, mode: Mode, event: &KeyEvent) -> Result<Option<Action>, OutlineError> {
        let mut matching = self
            .bindings(mode)
            .iter()
            .filter(|binding| binding.matches(event));
        let Some(first) = matching.next() else {
            return Ok(None);
        };
        if matching.next().is_some() {
            return Err(OutlineError::AmbiguousBinding {
                mode,
                chord: event.chord(),
            });
        }
        Ok(Some(first.action))
    }
}

fn validate(mode: Mode, bindings: &[Binding]) -> Result<(), OutlineError> {
    for (index, binding) in bindings.iter().enumerate() {
        let duplicate = bindings[..index]
            .iter()
            .any(|earlier| earlier.code == binding.code && earlier.modifiers == binding.modifiers);
        if duplicate {
            return Err(OutlineError::AmbiguousBinding {
                mode,
                chord: binding.chord(),
            });
        }
    }
    Ok(())
}
