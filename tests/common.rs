#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use ripple_signals::{Clock, Scheduler, TimerHandle};

/// Accumulates observed values; `check()` drains and returns everything seen
/// since the previous call.
pub fn watcher<T: 'static>() -> (impl Fn(T), impl Fn() -> Vec<T>) {
    let values = Rc::new(RefCell::new(Vec::new()));
    let sink = values.clone();
    let watch = move |value: T| sink.borrow_mut().push(value);
    let check = move || values.borrow_mut().drain(..).collect::<Vec<T>>();
    (watch, check)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init();
}

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Rc<Self> { Rc::new(Self { now: Cell::new(Instant::now()) }) }

    pub fn advance(&self, by: Duration) { self.now.set(self.now.get() + by); }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant { self.now.get() }
}

struct PendingTimer {
    handle: TimerHandle,
    due: Instant,
    task: Option<Box<dyn FnOnce()>>,
}

/// A timer queue pumped by hand: schedule against the manual clock, then
/// `run_due()` after advancing it.
pub struct ManualScheduler {
    clock: Rc<ManualClock>,
    timers: RefCell<Vec<PendingTimer>>,
    next_id: Cell<u64>,
    cancelled: Cell<usize>,
}

impl ManualScheduler {
    pub fn new(clock: Rc<ManualClock>) -> Rc<Self> {
        Rc::new(Self { clock, timers: RefCell::new(Vec::new()), next_id: Cell::new(0), cancelled: Cell::new(0) })
    }

    /// Fire every timer whose due time has passed, in schedule order.
    pub fn run_due(&self) {
        loop {
            let now = self.clock.now();
            let task = {
                let mut timers = self.timers.borrow_mut();
                match timers.iter().position(|timer| timer.due <= now) {
                    Some(index) => timers.remove(index).task.take(),
                    None => break,
                }
            };
            if let Some(task) = task {
                task();
            }
        }
    }

    pub fn pending(&self) -> usize { self.timers.borrow().len() }

    /// How many live timers have been cancelled so far.
    pub fn cancelled(&self) -> usize { self.cancelled.get() }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let handle = TimerHandle::new(id);
        self.timers.borrow_mut().push(PendingTimer { handle, due: self.clock.now() + delay, task: Some(task) });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut timers = self.timers.borrow_mut();
        let before = timers.len();
        timers.retain(|timer| timer.handle != handle);
        if timers.len() != before {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}
