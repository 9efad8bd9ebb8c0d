use tracing::{debug, warn};

use super::keystroke::KeyStroke;
use super::{Action, Trigger};
use crate::storage::BindingsConfig;

/// Resolved identifier for every action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    /// Indexed by action, in [`Action::ALL`] order.
    strokes: [KeyStroke; Action::COUNT],
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            strokes: Action::ALL.map(Action::default_stroke),
        }
    }
}

impl Bindings {
    /// Resolve configured binding strings. A missing or unparsable entry is
    /// replaced by the action's built-in default and reported as a warning.
    pub fn from_config(config: &BindingsConfig) -> Self {
        let strokes = Action::ALL.map(|action| match config.get(action) {
            Some(raw) => raw.parse::<KeyStroke>().unwrap_or_else(|e| {
                warn!(
                    action = %action,
                    binding = %raw,
                    error = %e,
                    default = action.default_binding(),
                    "Unable to parse binding, using default"
                );
                action.default_stroke()
            }),
            None => {
                warn!(
                    action = %action,
                    default = action.default_binding(),
                    "No binding configured, using default"
                );
                action.default_stroke()
            }
        });
        Self { strokes }
    }

    pub fn get(&self, action: Action) -> &KeyStroke {
        &self.strokes[action.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, &KeyStroke)> {
        Action::ALL.into_iter().zip(self.strokes.iter())
    }

    /// Every trigger bound to `stroke`, in dispatch order. Empty when the
    /// stroke is not bound.
    pub fn dispatch(&self, stroke: &KeyStroke) -> Vec<Trigger> {
        self.iter()
            .filter(|(_, bound)| *bound == stroke)
            .map(|(action, _)| action.trigger())
            .collect()
    }

    /// Parse a textual identifier and dispatch it. Unparsable identifiers are
    /// ignored like unbound ones.
    pub fn dispatch_str(&self, identifier: &str) -> Vec<Trigger> {
        match identifier.parse::<KeyStroke>() {
            Ok(stroke) => self.dispatch(&stroke),
            Err(e) => {
                debug!(identifier, error = %e, "ignoring unrecognized trigger");
                Vec::new()
            }
        }
    }
}
