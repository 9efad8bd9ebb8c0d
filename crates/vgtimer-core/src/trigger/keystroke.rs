//! Textual trigger identifiers like `"control F9"` or `"MINUS"`.
//!
//! Grammar: `modifier* (pressed | released | typed)? key`, whitespace
//! separated, case-insensitive. `typed` only takes a character key.

use std::fmt;
use std::str::FromStr;

use crate::error::BindingError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub meta: bool,
    pub alt: bool,
    pub alt_graph: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        meta: false,
        alt: false,
        alt_graph: false,
    };

    /// Set the modifier named by `token`; false if it names none.
    fn set(&mut self, token: &str) -> bool {
        let flag = match token.to_ascii_lowercase().as_str() {
            "shift" => &mut self.shift,
            "control" | "ctrl" => &mut self.control,
            "meta" => &mut self.meta,
            "alt" => &mut self.alt,
            "altgraph" => &mut self.alt_graph,
            _ => return false,
        };
        *flag = true;
        true
    }

    fn names(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.shift, "shift"),
            (self.control, "control"),
            (self.meta, "meta"),
            (self.alt, "alt"),
            (self.alt_graph, "altGraph"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
    }
}

const NAMED_KEYS: &[&str] = &[
    "MINUS",
    "EQUALS",
    "SPACE",
    "ENTER",
    "ESCAPE",
    "TAB",
    "BACK_SPACE",
    "DELETE",
    "INSERT",
    "HOME",
    "END",
    "PAGE_UP",
    "PAGE_DOWN",
    "UP",
    "DOWN",
    "LEFT",
    "RIGHT",
    "COMMA",
    "PERIOD",
    "SLASH",
    "BACK_SLASH",
    "SEMICOLON",
    "QUOTE",
    "OPEN_BRACKET",
    "CLOSE_BRACKET",
    "BACK_QUOTE",
    "PAUSE",
];

/// Single-character spellings of named keys.
const SYMBOL_ALIASES: &[(&str, &str)] = &[
    ("-", "MINUS"),
    ("=", "EQUALS"),
    (",", "COMMA"),
    (".", "PERIOD"),
    ("/", "SLASH"),
    ("\\", "BACK_SLASH"),
    (";", "SEMICOLON"),
    ("'", "QUOTE"),
    ("[", "OPEN_BRACKET"),
    ("]", "CLOSE_BRACKET"),
    ("`", "BACK_QUOTE"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `A`-`Z` or `0`-`9`.
    Char(char),
    /// `F1`-`F24`.
    Function(u8),
    /// `NUMPAD0`-`NUMPAD9`.
    Numpad(u8),
    Named(&'static str),
}

impl Key {
    fn parse(token: &str) -> Option<Key> {
        let upper = token.to_ascii_uppercase();

        let mut chars = upper.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphanumeric() {
                return Some(Key::Char(c));
            }
        }

        if let Some(n) = upper.strip_prefix("NUMPAD").and_then(|d| d.parse::<u8>().ok()) {
            return (n <= 9).then_some(Key::Numpad(n));
        }
        if let Some(n) = upper.strip_prefix('F').and_then(|d| d.parse::<u8>().ok()) {
            return (1..=24).contains(&n).then_some(Key::Function(n));
        }

        NAMED_KEYS
            .iter()
            .find(|name| **name == upper)
            .or_else(|| {
                SYMBOL_ALIASES
                    .iter()
                    .find(|(symbol, _)| *symbol == token)
                    .map(|(_, name)| name)
            })
            .map(|name| Key::Named(*name))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Function(n) => write!(f, "F{n}"),
            Key::Numpad(n) => write!(f, "NUMPAD{n}"),
            Key::Named(name) => f.write_str(name),
        }
    }
}

/// Which key event a stroke fires on. Strokes differing only in phase are
/// distinct identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    #[default]
    Pressed,
    Released,
    Typed,
}

impl KeyPhase {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "pressed" => Some(KeyPhase::Pressed),
            "released" => Some(KeyPhase::Released),
            "typed" => Some(KeyPhase::Typed),
            _ => None,
        }
    }
}

/// A key plus modifiers; the identifier a trigger event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub modifiers: Modifiers,
    pub phase: KeyPhase,
    pub key: Key,
}

impl FromStr for KeyStroke {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err(BindingError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut phase = None;
        let key = loop {
            let Some(token) = tokens.next() else {
                return Err(BindingError::MissingKey(s.trim().to_string()));
            };
            if phase.is_none() && modifiers.set(token) {
                continue;
            }
            if let Some(parsed) = KeyPhase::parse(token) {
                if phase.replace(parsed).is_some() {
                    return Err(BindingError::UnknownModifier(token.to_string()));
                }
                continue;
            }
            match Key::parse(token) {
                Some(key) => break key,
                None if tokens.peek().is_some() => {
                    return Err(BindingError::UnknownModifier(token.to_string()))
                }
                None => return Err(BindingError::UnknownKey(token.to_string())),
            }
        };

        let rest: Vec<&str> = tokens.collect();
        if !rest.is_empty() {
            return Err(BindingError::TrailingTokens(rest.join(" ")));
        }

        let phase = phase.unwrap_or_default();
        if phase == KeyPhase::Typed && !matches!(key, Key::Char(_)) {
            return Err(BindingError::UnknownKey(key.to_string()));
        }

        Ok(KeyStroke {
            modifiers,
            phase,
            key,
        })
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.modifiers.names() {
            write!(f, "{name} ")?;
        }
        match self.phase {
            KeyPhase::Pressed => {}
            KeyPhase::Released => f.write_str("released ")?,
            KeyPhase::Typed => f.write_str("typed ")?,
        }
        write!(f, "{}", self.key)
    }
}
