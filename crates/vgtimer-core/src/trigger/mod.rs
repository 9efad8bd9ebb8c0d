//! Control actions and the identifiers that select them.
//!
//! The capture of trigger events (global hotkeys, stdin, IPC) lives outside
//! the core. The core only maps an identifier to zero or more [`Trigger`]s.

mod bindings;
mod keystroke;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timer::TimerKind;

pub use bindings::Bindings;
pub use keystroke::{Key, KeyPhase, KeyStroke, Modifiers};

/// A control action applied to the timer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "kind", rename_all = "snake_case")]
pub enum Trigger {
    ResetAllAndStart,
    Stop,
    Reset(TimerKind),
}

/// The bindable actions, named as they appear in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Reset,
    Stop,
    Green,
    Break,
    Segment,
    Blue,
}

impl Action {
    pub const COUNT: usize = 6;

    /// Dispatch order when one identifier is bound to several actions.
    pub const ALL: [Action; Self::COUNT] = [
        Action::Reset,
        Action::Stop,
        Action::Green,
        Action::Break,
        Action::Segment,
        Action::Blue,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            Action::Reset => 0,
            Action::Stop => 1,
            Action::Green => 2,
            Action::Break => 3,
            Action::Segment => 4,
            Action::Blue => 5,
        }
    }

    pub const fn trigger(self) -> Trigger {
        match self {
            Action::Reset => Trigger::ResetAllAndStart,
            Action::Stop => Trigger::Stop,
            Action::Green => Trigger::Reset(TimerKind::Green),
            Action::Break => Trigger::Reset(TimerKind::Break),
            Action::Segment => Trigger::Reset(TimerKind::Segment),
            Action::Blue => Trigger::Reset(TimerKind::Blue),
        }
    }

    /// Built-in binding used when configuration is missing or invalid.
    pub const fn default_binding(self) -> &'static str {
        match self {
            Action::Reset => "control F9",
            Action::Stop => "control F10",
            Action::Green => "8",
            Action::Break => "9",
            Action::Segment => "0",
            Action::Blue => "MINUS",
        }
    }

    /// [`Self::default_binding`] in parsed form.
    pub const fn default_stroke(self) -> KeyStroke {
        let control = Modifiers {
            control: true,
            ..Modifiers::NONE
        };
        let (modifiers, key) = match self {
            Action::Reset => (control, Key::Function(9)),
            Action::Stop => (control, Key::Function(10)),
            Action::Green => (Modifiers::NONE, Key::Char('8')),
            Action::Break => (Modifiers::NONE, Key::Char('9')),
            Action::Segment => (Modifiers::NONE, Key::Char('0')),
            Action::Blue => (Modifiers::NONE, Key::Named("MINUS")),
        };
        KeyStroke {
            modifiers,
            phase: KeyPhase::Pressed,
            key,
        }
    }

    pub const fn config_key(self) -> &'static str {
        match self {
            Action::Reset => "reset",
            Action::Stop => "stop",
            Action::Green => "green",
            Action::Break => "break",
            Action::Segment => "segment",
            Action::Blue => "blue",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::ResetAllAndStart => f.write_str("reset all"),
            Trigger::Stop => f.write_str("stop"),
            Trigger::Reset(kind) => write!(f, "reset {kind}"),
        }
    }
}
