use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{GroupState, TimerKind, TimerReading};

/// Every state change in the timer group produces an Event.
/// The driver logs them; `--json` mode prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GroupStarted {
        at: DateTime<Utc>,
    },
    GroupStopped {
        at: DateTime<Utc>,
    },
    TimerReset {
        kind: TimerKind,
        next_activation: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A timer finished its cycle and moved on to the next one.
    TimerRolledOver {
        kind: TimerKind,
        next_activation: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: GroupState,
        readings: Vec<TimerReading>,
        at: DateTime<Utc>,
    },
}
