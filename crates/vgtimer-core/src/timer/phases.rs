use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// The four mechanics tracked during the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Green,
    Break,
    Segment,
    Blue,
}

impl TimerKind {
    pub const COUNT: usize = 4;

    pub const ALL: [TimerKind; Self::COUNT] = [
        TimerKind::Green,
        TimerKind::Break,
        TimerKind::Segment,
        TimerKind::Blue,
    ];

    /// Fixed phase configuration for this kind.
    pub const fn phases(self) -> Phases {
        match self {
            // Circle appears, lightning strikes 7s later.
            TimerKind::Green => Phases::from_secs(8, 7, 0),
            // Bar stays up for roughly 2s after it opens.
            TimerKind::Break => Phases::from_secs(30, 0, 2),
            TimerKind::Segment => Phases::from_secs(20, 0, 0),
            TimerKind::Blue => Phases::from_secs(9, 0, 0),
        }
    }

    /// Label shown next to the remaining time.
    pub const fn label(self) -> &'static str {
        match self {
            TimerKind::Green => "Green circle",
            TimerKind::Break => "Break",
            TimerKind::Segment => "Next segment",
            TimerKind::Blue => "Blue circles",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            TimerKind::Green => 0,
            TimerKind::Break => 1,
            TimerKind::Segment => 2,
            TimerKind::Blue => 3,
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerKind::Green => "green",
            TimerKind::Break => "break",
            TimerKind::Segment => "segment",
            TimerKind::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// The three durations that shape one cycle of a timer.
///
/// Stored as unsigned milliseconds so that a negative phase cannot be
/// expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phases {
    /// Gap between the end of one cycle and the start of the next.
    pub interval_ms: u32,
    /// From cycle start to the strike.
    pub pre_strike_ms: u32,
    /// From the strike to the end of the cycle.
    pub post_strike_ms: u32,
}

impl Phases {
    pub const fn new(interval_ms: u32, pre_strike_ms: u32, post_strike_ms: u32) -> Self {
        Self {
            interval_ms,
            pre_strike_ms,
            post_strike_ms,
        }
    }

    pub const fn from_secs(interval: u32, pre_strike: u32, post_strike: u32) -> Self {
        Self::new(interval * 1000, pre_strike * 1000, post_strike * 1000)
    }

    pub fn interval(&self) -> Duration {
        Duration::milliseconds(i64::from(self.interval_ms))
    }

    pub fn pre_strike_delay(&self) -> Duration {
        Duration::milliseconds(i64::from(self.pre_strike_ms))
    }

    pub fn post_strike_delay(&self) -> Duration {
        Duration::milliseconds(i64::from(self.post_strike_ms))
    }

    /// Time from cycle start until the settle phase is over.
    pub fn active_length(&self) -> Duration {
        self.pre_strike_delay() + self.post_strike_delay()
    }

    /// Full cycle: interval + pre-strike delay + post-strike delay.
    pub fn cycle_length(&self) -> Duration {
        self.interval() + self.pre_strike_delay() + self.post_strike_delay()
    }

    /// Whether the timer has a countdown to a strike distinct from its start.
    pub fn has_strike_phase(&self) -> bool {
        self.pre_strike_ms > 0
    }
}
