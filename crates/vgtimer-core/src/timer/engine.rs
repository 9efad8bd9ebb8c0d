//! Per-kind phase model.
//!
//! A timer holds a single mutable timestamp: the start of its current cycle.
//! Everything else is derived from that instant and the fixed [`Phases`].
//!
//! ```text
//! next_activation          strike                 cycle end        next start
//!       |---- pre_strike ----|---- post_strike ----|---- interval ----|
//! ```
//!
//! Every query takes `now` so one update observes one clock read.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::phases::{Phases, TimerKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    kind: TimerKind,
    phases: Phases,
    /// Start of the current cycle. `None` until the first reset.
    next_activation: Option<DateTime<Utc>>,
}

impl Timer {
    pub fn new(kind: TimerKind) -> Self {
        Self::with_phases(kind, kind.phases())
    }

    pub fn with_phases(kind: TimerKind, phases: Phases) -> Self {
        Self {
            kind,
            phases,
            next_activation: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn phases(&self) -> &Phases {
        &self.phases
    }

    pub fn next_activation(&self) -> Option<DateTime<Utc>> {
        self.next_activation
    }

    /// Signed time until the cycle (re)starts. Negative while the strike or
    /// settle phase is in progress.
    pub fn time_to_activation(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.next_activation.map(|next| next - now)
    }

    /// Signed time until the strike of the current cycle.
    pub fn time_to_strike(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.next_activation
            .map(|next| next + self.phases.pre_strike_delay() - now)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Mark the event as just finished.
    ///
    /// Backdating by the post-strike delay makes the current cycle end exactly
    /// at `now`, so the next rollover lands on a fresh cycle instead of
    /// replaying the settle phase.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.next_activation = Some(now - self.phases.post_strike_delay());
    }

    /// Roll over by exactly one cycle once the current one has fully elapsed.
    ///
    /// Advances at most once per call; a timer lagging several cycles behind
    /// catches up one cycle per call. Returns whether a rollover happened.
    pub fn advance_if_elapsed(&mut self, now: DateTime<Utc>) -> bool {
        let Some(next) = self.next_activation else {
            return false;
        };
        if now > next + self.phases.active_length() {
            self.next_activation = Some(next + self.phases.cycle_length());
            return true;
        }
        false
    }
}
