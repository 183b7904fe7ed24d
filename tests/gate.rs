mod common;

use common::watcher;
use ripple_signals::Input;

#[test]
fn test_gate_holds_and_releases_once() {
    let s = Input::new(0);
    let g = Input::new(false);
    let gated = g.signal().gate(&s.signal().event());

    let (watch, check) = watcher();
    let _out = gated.output(watch);
    assert_eq!(check(), Vec::<i32>::new());

    // Values arriving while the gate is closed are held, newest wins.
    s.set(5);
    s.set(6);
    assert_eq!(check(), Vec::<i32>::new());

    // Opening releases the pending value exactly once; later toggles find
    // nothing pending.
    g.set(true);
    g.set(false);
    g.set(true);
    assert_eq!(check(), vec![6]);
}

#[test]
fn test_new_source_begin_drops_deferred() {
    let s = Input::new(0);
    let g = Input::new(false);
    let gated = g.signal().gate(&s.signal().event());

    let (watch, check) = watcher();
    let _out = gated.output(watch);

    s.set(1);
    s.set(2); // the fresh begin clears 1 before 2 is deferred
    g.set(true);
    assert_eq!(check(), vec![2]);
}

#[test]
fn test_deferred_value_survives_failed_settles() {
    let s = Input::new(0);
    let g = Input::new(false);
    let gated = g.signal().gate(&s.signal().event());

    let (watch, check) = watcher();
    let _out = gated.output(watch);

    s.set(9);
    g.set(false); // settles with the gate still closed, 9 stays pending
    assert_eq!(check(), Vec::<i32>::new());

    g.set(true);
    assert_eq!(check(), vec![9]);
}

#[test]
fn test_source_and_gate_changing_together_release() {
    // Source and guard both derive from one input, so a single assignment
    // raises the count on both arms and settles once.
    let n = Input::new(0);
    let gated = n.signal().map(|v| *v > 0).gate(&n.signal().event());

    let (watch, check) = watcher();
    let _out = gated.output(watch);
    check();

    n.set(5);
    assert_eq!(check(), vec![5]);

    n.set(-1); // guard closes in the same group, -1 stays pending
    assert_eq!(check(), Vec::<i32>::new());

    n.set(3); // fresh begin drops -1, then 3 releases
    assert_eq!(check(), vec![3]);
}
