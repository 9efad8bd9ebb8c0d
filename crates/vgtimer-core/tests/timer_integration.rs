//! Integration tests for the timer group driven by a manual clock.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use vgtimer_core::{
    format_duration, Clock, Event, ManualClock, Phases, Timer, TimerGroup, TimerKind, Trigger,
};

fn base() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
}

fn ms(n: i64) -> Duration {
    Duration::milliseconds(n)
}

#[test]
fn green_circle_full_cycle() {
    let clock = ManualClock::new(base());
    let mut group = TimerGroup::new();
    group.reset_all_and_start(clock.now());

    let green = group.timer(TimerKind::Green);
    assert_eq!(green.time_to_activation(clock.now()), Some(ms(0)));
    assert_eq!(green.time_to_strike(clock.now()), Some(ms(7000)));

    clock.advance(ms(7000));
    assert_eq!(
        group.timer(TimerKind::Green).time_to_strike(clock.now()),
        Some(ms(0))
    );

    clock.advance(ms(8000));
    let before = group.timer(TimerKind::Green).next_activation().unwrap();
    let events = group.update(clock.now());
    let after = group.timer(TimerKind::Green).next_activation().unwrap();

    assert_eq!(after - before, ms(15_000));
    assert_eq!(
        group.timer(TimerKind::Green).time_to_activation(clock.now()),
        Some(ms(0))
    );
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TimerRolledOver { kind: TimerKind::Green, .. })));
}

#[test]
fn polling_every_100ms_tracks_wall_clock() {
    let clock = ManualClock::new(base());
    let mut group = TimerGroup::new();
    group.reset_all_and_start(clock.now());

    // Five minutes of ticks.
    for _ in 0..3000 {
        clock.advance(ms(100));
        group.update(clock.now());
    }

    let now = clock.now();
    for kind in TimerKind::ALL {
        let timer = group.timer(kind);
        let phases = kind.phases();
        let next = timer.next_activation().unwrap();
        // Current: the cycle has not fully elapsed.
        assert!(now <= next + phases.active_length(), "{kind} is lagging");
        // And it is the latest one: the previous cycle had ended.
        assert!(now > next - phases.cycle_length() + phases.active_length());
        // Whole number of cycles since reset.
        let since_reset = next - (base() - phases.post_strike_delay());
        assert_eq!(
            since_reset.num_milliseconds() % phases.cycle_length().num_milliseconds(),
            0
        );
    }
}

#[test]
fn stopped_group_ignores_updates_until_restart() {
    let clock = ManualClock::new(base());
    let mut group = TimerGroup::new();
    group.apply(Trigger::ResetAllAndStart, clock.now());
    clock.advance(ms(3000));
    group.apply(Trigger::Stop, clock.now());

    let frozen: Vec<_> = group.timers().map(Timer::next_activation).collect();
    for _ in 0..100 {
        clock.advance(ms(60_000));
        assert!(group.update(clock.now()).is_empty());
    }
    let still: Vec<_> = group.timers().map(Timer::next_activation).collect();
    assert_eq!(frozen, still);

    // Individual reset while stopped lands but is not advanced.
    group.apply(Trigger::Reset(TimerKind::Blue), clock.now());
    assert!(!group.is_running());
    assert!(group.update(clock.now() + ms(60_000)).is_empty());

    group.apply(Trigger::ResetAllAndStart, clock.now());
    assert!(group.is_running());
    assert_eq!(
        group.timer(TimerKind::Segment).time_to_activation(clock.now()),
        Some(ms(0))
    );
}

#[test]
fn resumed_updates_catch_up_one_cycle_per_tick() {
    let clock = ManualClock::new(base());
    let mut group = TimerGroup::new();
    group.reset_all_and_start(clock.now());

    // Process suspended for 100s: segment (20s cycles) is five cycles behind.
    clock.advance(ms(100_000));
    let mut ticks = 0;
    while group
        .update(clock.now())
        .iter()
        .any(|e| matches!(e, Event::TimerRolledOver { kind: TimerKind::Segment, .. }))
    {
        ticks += 1;
    }
    assert_eq!(ticks, 5);
    assert_eq!(
        format_duration(
            group
                .timer(TimerKind::Segment)
                .time_to_activation(clock.now())
                .unwrap()
        ),
        "0.0"
    );
}

proptest! {
    #[test]
    fn remaining_time_decreases_between_rollovers(
        t1 in 0i64..200_000,
        gap in 1i64..5_000,
    ) {
        let mut group = TimerGroup::new();
        group.reset_all_and_start(base());
        let at1 = base() + ms(t1);
        let at2 = at1 + ms(gap);

        group.update(at1);
        let first: Vec<_> = group.readings(at1);
        let rolled = group.update(at2);
        let second: Vec<_> = group.readings(at2);

        for (a, b) in first.iter().zip(second.iter()) {
            let rolled_this_kind = rolled.iter().any(|e| matches!(
                e,
                Event::TimerRolledOver { kind, .. } if *kind == a.kind
            ));
            if !rolled_this_kind {
                prop_assert_eq!(b.to_activation_ms, a.to_activation_ms - gap);
            }
        }
    }

    #[test]
    fn rollover_advances_at_most_one_cycle_per_call(
        interval in 0u32..60_000,
        pre in 0u32..10_000,
        post in 0u32..10_000,
        later in 0i64..10_000_000,
    ) {
        let phases = Phases::new(interval, pre, post);
        let mut timer = Timer::with_phases(TimerKind::Break, phases);
        timer.reset(base());
        let now = base() + ms(later);

        for _ in 0..3 {
            let before = timer.next_activation().unwrap();
            let advanced = timer.advance_if_elapsed(now);
            let after = timer.next_activation().unwrap();
            if advanced {
                prop_assert_eq!(after - before, phases.cycle_length());
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn second_call_is_noop_once_current(
        pre in 0u32..10_000,
        post in 0u32..10_000,
        later in 0i64..30_000,
    ) {
        // Cycle long enough that one rollover always catches up.
        let phases = Phases::new(60_000, pre, post);
        let mut timer = Timer::with_phases(TimerKind::Green, phases);
        timer.reset(base());
        let now = base() + ms(later);

        timer.advance_if_elapsed(now);
        let settled = timer.next_activation();
        prop_assert!(!timer.advance_if_elapsed(now));
        prop_assert_eq!(timer.next_activation(), settled);
    }

    #[test]
    fn reset_all_always_yields_fresh_cycles(warmup in 0i64..1_000_000, stopped in any::<bool>()) {
        let mut group = TimerGroup::new();
        group.reset_all_and_start(base());
        group.update(base() + ms(warmup));
        if stopped {
            group.stop(base() + ms(warmup));
        }
        let now = base() + ms(warmup);
        group.reset_all_and_start(now);

        prop_assert!(group.is_running());
        for kind in TimerKind::ALL {
            prop_assert_eq!(
                group.timer(kind).time_to_activation(now),
                Some(-kind.phases().post_strike_delay())
            );
        }
    }
}
