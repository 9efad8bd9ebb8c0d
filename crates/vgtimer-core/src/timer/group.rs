//! Group run-state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --reset_all_and_start--> Running
//! Running --stop--> Stopped
//! Running --update--> Running
//! ```
//!
//! `reset_one` is valid in both states and never changes the run flag.
//! There is no paused state: starting again always begins from fresh cycles.
//!
//! The group does not read the clock itself. The caller passes `now` into
//! every command so one tick observes a single instant.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::engine::Timer;
use super::phases::TimerKind;
use crate::events::Event;
use crate::trigger::Trigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupState {
    Stopped,
    Running,
}

/// Remaining times for one timer, in signed milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerReading {
    pub kind: TimerKind,
    pub to_activation_ms: i64,
    /// Only present for kinds with a pre-strike phase.
    pub to_strike_ms: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerGroup {
    timers: [Timer; TimerKind::COUNT],
    running: bool,
}

impl Default for TimerGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerGroup {
    /// Starts stopped, with no timer reset yet.
    pub fn new() -> Self {
        Self {
            timers: TimerKind::ALL.map(Timer::new),
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> GroupState {
        if self.running {
            GroupState::Running
        } else {
            GroupState::Stopped
        }
    }

    pub fn timer(&self, kind: TimerKind) -> &Timer {
        &self.timers[kind.index()]
    }

    pub fn timers(&self) -> impl Iterator<Item = &Timer> {
        self.timers.iter()
    }

    /// Remaining times for every timer that has been reset at least once.
    pub fn readings(&self, now: DateTime<Utc>) -> Vec<TimerReading> {
        self.timers
            .iter()
            .filter_map(|timer| {
                let to_activation = timer.time_to_activation(now)?;
                let to_strike = if timer.phases().has_strike_phase() {
                    timer.time_to_strike(now).map(|d| d.num_milliseconds())
                } else {
                    None
                };
                Some(TimerReading {
                    kind: timer.kind(),
                    to_activation_ms: to_activation.num_milliseconds(),
                    to_strike_ms: to_strike,
                })
            })
            .collect()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            readings: self.readings(now),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Reset every timer and start the group. Valid from any state.
    pub fn reset_all_and_start(&mut self, now: DateTime<Utc>) -> Event {
        for timer in &mut self.timers {
            timer.reset(now);
        }
        self.running = true;
        info!("all timers reset, group running");
        Event::GroupStarted { at: now }
    }

    /// Stop the group without touching any timer. No-op when already stopped.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        info!("group stopped");
        Some(Event::GroupStopped { at: now })
    }

    /// Reset a single timer. Does not change the run flag; while stopped the
    /// reset only becomes visible once the group runs again.
    pub fn reset_one(&mut self, kind: TimerKind, now: DateTime<Utc>) -> Event {
        let timer = &mut self.timers[kind.index()];
        timer.reset(now);
        info!(kind = %kind, running = self.running, "timer reset");
        Event::TimerReset {
            kind,
            next_activation: timer.next_activation().unwrap_or(now),
            at: now,
        }
    }

    /// Call periodically. Returns one `TimerRolledOver` per timer that moved
    /// into a new cycle; nothing is read or mutated while stopped.
    pub fn update(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }

        let mut events = Vec::new();
        for timer in &mut self.timers {
            if timer.advance_if_elapsed(now) {
                let next_activation = timer.next_activation().unwrap_or(now);
                debug!(kind = %timer.kind(), %next_activation, "timer rolled over");
                events.push(Event::TimerRolledOver {
                    kind: timer.kind(),
                    next_activation,
                    at: now,
                });
            }
        }
        events
    }

    /// Apply a control action delivered by a trigger.
    pub fn apply(&mut self, trigger: Trigger, now: DateTime<Utc>) -> Option<Event> {
        match trigger {
            Trigger::ResetAllAndStart => Some(self.reset_all_and_start(now)),
            Trigger::Stop => self.stop(now),
            Trigger::Reset(kind) => Some(self.reset_one(kind, now)),
        }
    }
}

/// A [`TimerGroup`] behind one lock, for drivers that deliver triggers from a
/// different thread than the polling tick.
#[derive(Debug, Clone, Default)]
pub struct SharedTimerGroup(Arc<Mutex<TimerGroup>>);

impl SharedTimerGroup {
    pub fn new(group: TimerGroup) -> Self {
        Self(Arc::new(Mutex::new(group)))
    }

    /// Run `f` with exclusive access to the group.
    ///
    /// Every mutation leaves the group consistent, so a poisoned lock is
    /// recovered rather than propagated.
    pub fn with<R>(&self, f: impl FnOnce(&mut TimerGroup) -> R) -> R {
        let mut group = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut group)
    }

    pub fn apply(&self, trigger: Trigger, now: DateTime<Utc>) -> Option<Event> {
        self.with(|group| group.apply(trigger, now))
    }

    /// One polling tick: advance timers, then read them under the same lock.
    pub fn tick(&self, now: DateTime<Utc>) -> (Vec<Event>, Vec<TimerReading>) {
        self.with(|group| {
            let events = group.update(now);
            (events, group.readings(now))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap()
    }

    fn activations(group: &TimerGroup) -> Vec<Option<DateTime<Utc>>> {
        group.timers().map(|t| t.next_activation()).collect()
    }

    #[test]
    fn starts_stopped_without_readings() {
        let group = TimerGroup::new();
        assert_eq!(group.state(), GroupState::Stopped);
        assert!(group.readings(at(0)).is_empty());
    }

    #[test]
    fn reset_all_and_start_runs_fresh_cycles() {
        let mut group = TimerGroup::new();
        group.reset_all_and_start(at(0));
        assert!(group.is_running());
        for kind in TimerKind::ALL {
            let post = kind.phases().post_strike_delay();
            assert_eq!(group.timer(kind).time_to_activation(at(0)), Some(-post));
        }
    }

    #[test]
    fn reset_all_from_running_discards_phase() {
        let mut group = TimerGroup::new();
        group.reset_all_and_start(at(0));
        group.update(at(50_000));
        group.reset_all_and_start(at(60_000));
        assert_eq!(
            group.timer(TimerKind::Segment).next_activation(),
            Some(at(60_000))
        );
    }

    #[test]
    fn stop_freezes_timers() {
        let mut group = TimerGroup::new();
        group.reset_all_and_start(at(0));
        assert!(group.stop(at(1000)).is_some());
        let before = activations(&group);
        for i in 0..50 {
            assert!(group.update(at(1000 + i * 100_000)).is_empty());
        }
        assert_eq!(activations(&group), before);
    }

    #[test]
    fn stop_twice_is_noop() {
        let mut group = TimerGroup::new();
        assert!(group.stop(at(0)).is_none());
        group.reset_all_and_start(at(0));
        assert!(group.stop(at(1)).is_some());
        assert!(group.stop(at(2)).is_none());
        assert_eq!(group.state(), GroupState::Stopped);
    }

    #[test]
    fn reset_one_keeps_run_flag() {
        let mut group = TimerGroup::new();
        group.reset_one(TimerKind::Blue, at(0));
        assert!(!group.is_running());
        assert_eq!(group.timer(TimerKind::Blue).next_activation(), Some(at(0)));
        assert!(group.timer(TimerKind::Green).next_activation().is_none());

        group.reset_all_and_start(at(0));
        group.reset_one(TimerKind::Green, at(3000));
        assert!(group.is_running());
        assert_eq!(group.timer(TimerKind::Green).next_activation(), Some(at(3000)));
    }

    #[test]
    fn update_reports_rollovers() {
        let mut group = TimerGroup::new();
        group.reset_all_and_start(at(0));
        let events = group.update(at(1));
        // Break's cycle ended exactly at reset; the rest are still in phase.
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| matches!(
            e,
            Event::TimerRolledOver { kind, .. } if *kind != TimerKind::Green
        )));
    }

    #[test]
    fn readings_only_strike_for_green() {
        let mut group = TimerGroup::new();
        group.reset_all_and_start(at(0));
        let readings = group.readings(at(1000));
        assert_eq!(readings.len(), 4);
        for reading in readings {
            match reading.kind {
                TimerKind::Green => assert_eq!(reading.to_strike_ms, Some(6000)),
                _ => assert!(reading.to_strike_ms.is_none()),
            }
        }
    }

    #[test]
    fn apply_dispatches_actions() {
        let mut group = TimerGroup::new();
        assert!(matches!(
            group.apply(Trigger::ResetAllAndStart, at(0)),
            Some(Event::GroupStarted { .. })
        ));
        assert!(matches!(
            group.apply(Trigger::Reset(TimerKind::Break), at(500)),
            Some(Event::TimerReset { kind: TimerKind::Break, .. })
        ));
        assert!(matches!(
            group.apply(Trigger::Stop, at(600)),
            Some(Event::GroupStopped { .. })
        ));
        assert!(group.apply(Trigger::Stop, at(700)).is_none());
    }

    #[test]
    fn snapshot_carries_state() {
        let mut group = TimerGroup::new();
        group.reset_all_and_start(at(0));
        match group.snapshot(at(250)) {
            Event::StateSnapshot {
                state, readings, ..
            } => {
                assert_eq!(state, GroupState::Running);
                let green = readings
                    .iter()
                    .find(|r| r.kind == TimerKind::Green)
                    .unwrap();
                assert_eq!(green.to_activation_ms, -250);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn shared_group_serializes_tick_and_triggers() {
        let shared = SharedTimerGroup::default();
        let handle = shared.clone();
        std::thread::spawn(move || {
            handle.apply(Trigger::ResetAllAndStart, at(0));
        })
        .join()
        .unwrap();

        let (_, readings) = shared.tick(at(2000));
        let green = readings
            .iter()
            .find(|r| r.kind == TimerKind::Green)
            .unwrap();
        assert_eq!(green.to_strike_ms, Some(5000));
        assert_eq!(
            shared.with(|g| g.timer(TimerKind::Green).time_to_activation(at(2000))),
            Some(Duration::milliseconds(-2000))
        );
    }
}
