mod common;

use std::time::Duration;

use common::{watcher, ManualClock, ManualScheduler};
use ripple_signals::Input;

const WINDOW: Duration = Duration::from_millis(100);

#[test]
fn test_first_emission_is_immediate() {
    let clock = ManualClock::new();
    let scheduler = ManualScheduler::new(clock.clone());
    let x = Input::new(0);
    let throttled = x.signal().event().throttle(WINDOW, clock.clone(), scheduler.clone());

    let (watch, check) = watcher();
    let _out = throttled.output(watch);

    x.set(1);
    assert_eq!(check(), vec![1]);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_value_within_window_is_deferred() {
    let clock = ManualClock::new();
    let scheduler = ManualScheduler::new(clock.clone());
    let x = Input::new(0);
    let throttled = x.signal().event().throttle(WINDOW, clock.clone(), scheduler.clone());

    let (watch, check) = watcher();
    let _out = throttled.output(watch);

    x.set(1);
    assert_eq!(check(), vec![1]);

    clock.advance(Duration::from_millis(40));
    x.set(2);
    assert_eq!(check(), Vec::<i32>::new());
    assert_eq!(scheduler.pending(), 1);

    // The timer was armed for the remaining interval, not a fresh full one.
    clock.advance(Duration::from_millis(61));
    scheduler.run_due();
    assert_eq!(check(), vec![2]);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_newer_value_replaces_deferred() {
    let clock = ManualClock::new();
    let scheduler = ManualScheduler::new(clock.clone());
    let x = Input::new(0);
    let throttled = x.signal().event().throttle(WINDOW, clock.clone(), scheduler.clone());

    let (watch, check) = watcher();
    let _out = throttled.output(watch);

    x.set(1);
    x.set(2);
    x.set(3);
    assert_eq!(scheduler.pending(), 1);
    assert_eq!(scheduler.cancelled(), 1); // 2's timer was replaced by 3's

    clock.advance(Duration::from_millis(150));
    scheduler.run_due();
    assert_eq!(check(), vec![1, 3]);
}

#[test]
fn test_spaced_values_all_pass() {
    let clock = ManualClock::new();
    let scheduler = ManualScheduler::new(clock.clone());
    let x = Input::new(0);
    let throttled = x.signal().event().throttle(WINDOW, clock.clone(), scheduler.clone());

    let (watch, check) = watcher();
    let _out = throttled.output(watch);

    x.set(1);
    clock.advance(Duration::from_millis(101));
    x.set(2);
    clock.advance(Duration::from_millis(101));
    x.set(3);
    assert_eq!(check(), vec![1, 2, 3]);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_dropping_the_node_cancels_its_timer() {
    let clock = ManualClock::new();
    let scheduler = ManualScheduler::new(clock.clone());
    let x = Input::new(0);
    let throttled = x.signal().event().throttle(WINDOW, clock.clone(), scheduler.clone());

    let (watch, check) = watcher();
    let out = throttled.output(watch);

    x.set(1);
    x.set(2);
    assert_eq!(scheduler.pending(), 1);

    drop(out);
    drop(throttled);
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.cancelled(), 1);

    clock.advance(Duration::from_millis(200));
    scheduler.run_due();
    assert_eq!(check(), vec![1]);
}
